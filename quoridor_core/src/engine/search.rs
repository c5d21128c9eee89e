use crate::engine::config::{EngineConfig, SearchForm};
use crate::engine::eval::PathEvaluator;
use crate::engine::move_list::ScoredMove;
use crate::engine::movegen::CandidateGen;
use crate::engine::{fallback_step, Evaluator, Move, SearchStats, Strategy};
use crate::logic::board::Position;
use crate::logic::game::{GameState, GameStatus};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

pub const INFINITY: i32 = 10_000_000;

/// Fixed-depth alpha-beta search over the filtered candidate set.
pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    evaluator: PathEvaluator,
    recent_destinations: VecDeque<Position>,
    nodes_searched: u32,
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: PathEvaluator::new(config.clone()),
            recent_destinations: VecDeque::with_capacity(config.oscillation_memory + 1),
            config,
            nodes_searched: 0,
        }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.evaluator = PathEvaluator::new(config.clone());
        self.config = config;
        while self.recent_destinations.len() > self.config.oscillation_memory {
            self.recent_destinations.pop_front();
        }
    }

    /// Forgets the destinations used to avoid shuffling back and forth.
    pub fn reset_memory(&mut self) {
        self.recent_destinations.clear();
    }

    pub fn recent_destinations(&self) -> impl Iterator<Item = &Position> {
        self.recent_destinations.iter()
    }

    /// Searched value of the position for the player to move.
    pub fn root_value(&mut self, state: &GameState) -> i32 {
        let mut scratch = state.scratch_copy();
        let side = scratch.current;
        let depth = self.config.search_depth.max(1);
        if scratch.is_over() {
            return self.terminal_score(&scratch, side, depth);
        }
        match self.score_root(&mut scratch, depth) {
            Some((best, _)) => best,
            None => self.evaluator.evaluate(&scratch, side),
        }
    }

    fn terminal_score(&self, state: &GameState, side: usize, depth: u8) -> i32 {
        let score = self.config.win_score.saturating_add(i32::from(depth));
        match state.status {
            GameStatus::Won(winner) if winner == side => score,
            _ => -score,
        }
    }

    // Scores every root candidate. Children are searched with a window one
    // below the best value so far, so every value tied with the best is exact.
    fn score_root(
        &mut self,
        state: &mut GameState,
        depth: u8,
    ) -> Option<(i32, Vec<(ScoredMove, i32)>)> {
        let side = state.current;
        let candidates = CandidateGen::new(&self.config).generate(state);
        if candidates.is_empty() {
            return None;
        }

        let mut best = -INFINITY;
        let mut scored = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            let alpha = best.saturating_sub(1);
            let value = self.explore(state, candidate.mv, |engine, state| {
                engine.child_value(state, side, depth - 1, alpha, INFINITY)
            });
            best = best.max(value);
            scored.push((*candidate, value));
        }
        Some((best, scored))
    }

    /// Value of the position reached after `side` moved, from `side`'s view.
    fn child_value(&mut self, state: &mut GameState, side: usize, depth: u8, alpha: i32, beta: i32) -> i32 {
        match self.config.search_form {
            SearchForm::Negamax => -self.negamax(state, 1 - side, depth, -beta, -alpha),
            SearchForm::Minimax => self.minimax(state, side, depth, alpha, beta),
        }
    }

    // Applies `mv`, runs `visit`, reverts. Debug builds check the revert was exact.
    fn explore<F>(&mut self, state: &mut GameState, mv: Move, visit: F) -> i32
    where
        F: FnOnce(&mut Self, &mut GameState) -> i32,
    {
        #[cfg(debug_assertions)]
        let snapshot = state.clone();

        let record = state.apply(mv);
        let value = visit(self, state);
        state.revert(&record);

        #[cfg(debug_assertions)]
        debug_assert!(*state == snapshot, "state not restored after {mv}");

        value
    }

    /// `side` is the player to move at this node, or the winner at a terminal one.
    fn negamax(&mut self, state: &mut GameState, side: usize, depth: u8, mut alpha: i32, beta: i32) -> i32 {
        self.nodes_searched += 1;

        if state.is_over() {
            return self.terminal_score(state, side, depth);
        }
        if depth == 0 {
            return self.evaluator.evaluate(state, side);
        }

        let candidates = CandidateGen::new(&self.config).generate(state);
        if candidates.is_empty() {
            return self.evaluator.evaluate(state, side);
        }

        let mut best = -INFINITY;
        for candidate in &candidates {
            let score = self.explore(state, candidate.mv, |engine, state| {
                -engine.negamax(state, 1 - side, depth - 1, -beta, -alpha)
            });

            best = best.max(score);
            alpha = alpha.max(score);
            if self.config.alpha_beta && alpha >= beta {
                break;
            }
        }
        best
    }

    /// Values are always from `root_side`'s point of view.
    fn minimax(&mut self, state: &mut GameState, root_side: usize, depth: u8, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes_searched += 1;

        if state.is_over() {
            return self.terminal_score(state, root_side, depth);
        }
        if depth == 0 {
            return self.evaluator.evaluate(state, root_side);
        }

        let candidates = CandidateGen::new(&self.config).generate(state);
        if candidates.is_empty() {
            return self.evaluator.evaluate(state, root_side);
        }

        let maximizing = state.current == root_side;
        let mut best = if maximizing { -INFINITY } else { INFINITY };
        for candidate in &candidates {
            let score = self.explore(state, candidate.mv, |engine, state| {
                engine.minimax(state, root_side, depth - 1, alpha, beta)
            });

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if self.config.alpha_beta && alpha >= beta {
                break;
            }
        }
        best
    }

    // Among moves tied at the best value: skip recently visited squares,
    // prefer steps, and among steps the shortest resulting path.
    fn pick(&self, scored: &[(ScoredMove, i32)], best: i32) -> Option<ScoredMove> {
        let tied: Vec<ScoredMove> = scored
            .iter()
            .filter(|(_, value)| *value == best)
            .map(|(candidate, _)| *candidate)
            .collect();

        let fresh: Vec<ScoredMove> = tied
            .iter()
            .filter(|c| {
                c.mv.destination()
                    .map_or(true, |to| !self.recent_destinations.contains(&to))
            })
            .copied()
            .collect();
        let pool = if fresh.is_empty() { tied } else { fresh };

        pool.iter()
            .filter(|c| c.mv.is_step())
            .min_by_key(|c| c.score)
            .or_else(|| pool.first())
            .copied()
    }

    fn remember(&mut self, mv: Move) {
        let Some(to) = mv.destination() else {
            return;
        };
        if self.config.oscillation_memory == 0 {
            return;
        }
        self.recent_destinations.push_back(to);
        while self.recent_destinations.len() > self.config.oscillation_memory {
            self.recent_destinations.pop_front();
        }
    }
}

impl Strategy for AlphaBetaEngine {
    fn search(&mut self, state: &GameState) -> Option<(Move, SearchStats)> {
        let start = Instant::now();
        self.nodes_searched = 0;
        let depth = self.config.search_depth.max(1);

        let mut scratch = state.scratch_copy();
        let chosen = if scratch.is_over() {
            None
        } else {
            self.score_root(&mut scratch, depth)
                .and_then(|(best, scored)| self.pick(&scored, best).map(|c| (c.mv, best)))
        };

        let mv = match chosen {
            Some((mv, value)) => {
                log::debug!("hard: {mv} valued {value} at depth {depth}");
                mv
            }
            None => fallback_step(state)?,
        };
        self.remember(mv);

        let stats = SearchStats {
            depth,
            nodes: self.nodes_searched,
            time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        log::debug!("hard search stats: {stats:?}");
        Some((mv, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::wall::Wall;

    fn engine_with(config: EngineConfig) -> AlphaBetaEngine {
        AlphaBetaEngine::new(Arc::new(config))
    }

    fn midgame() -> GameState {
        let mut state = GameState::default();
        assert!(state.make_move(Position::new(7, 4)));
        assert!(state.make_move(Position::new(1, 4)));
        assert!(state.place_wall(Wall::horizontal(2, 3)));
        assert!(state.make_move(Position::new(2, 4)));
        assert!(state.make_move(Position::new(6, 4)));
        assert!(state.make_move(Position::new(2, 5)));
        state
    }

    #[test]
    fn test_takes_immediate_win() {
        let mut state = GameState::default();
        state.players[0].position = Position::new(1, 2);
        state.players[1].position = Position::new(7, 2);
        let mut engine = engine_with(EngineConfig::default());
        let (mv, _) = engine.search(&state).unwrap();
        assert_eq!(mv, Move::Step(Position::new(0, 2)));
    }

    #[test]
    fn test_blocks_or_races_when_opponent_is_about_to_win() {
        let mut state = GameState::default();
        // Opponent one step from row 8, we are far away
        state.players[1].position = Position::new(7, 0);
        let mut engine = engine_with(EngineConfig::default());
        let (mv, _) = engine.search(&state).unwrap();
        let mut next = state.clone();
        assert_eq!(next.play(mv), Ok(()));
        assert!(next.path_length(1).unwrap() > 1, "{mv} lets the opponent win");
    }

    #[test]
    fn test_pruning_does_not_change_value() {
        let state = midgame();
        for form in [SearchForm::Negamax, SearchForm::Minimax] {
            let base = EngineConfig {
                search_depth: 3,
                search_form: form,
                ..EngineConfig::default()
            };
            let pruned = engine_with(base.clone()).root_value(&state);
            let full = engine_with(EngineConfig {
                alpha_beta: false,
                ..base
            })
            .root_value(&state);
            assert_eq!(pruned, full, "{form:?}");
        }
    }

    #[test]
    fn test_negamax_matches_minimax() {
        for state in [GameState::default(), midgame()] {
            let negamax = engine_with(EngineConfig {
                search_depth: 3,
                ..EngineConfig::default()
            })
            .root_value(&state);
            let minimax = engine_with(EngineConfig {
                search_depth: 3,
                search_form: SearchForm::Minimax,
                ..EngineConfig::default()
            })
            .root_value(&state);
            assert_eq!(negamax, minimax);
        }
    }

    #[test]
    fn test_search_leaves_caller_state_alone() {
        let state = midgame();
        let before = state.clone();
        let mut engine = engine_with(EngineConfig::default());
        let (mv, stats) = engine.search(&state).unwrap();
        assert_eq!(state, before);
        assert_eq!(state.validate(&mv), Ok(()));
        assert_eq!(stats.depth, 4);
        assert!(stats.nodes > 0);
    }

    #[test]
    fn test_faster_win_scores_higher() {
        let mut near = GameState::default();
        near.players[0].position = Position::new(1, 0);
        let mut far = GameState::default();
        far.players[0].position = Position::new(2, 0);
        let config = EngineConfig {
            search_depth: 3,
            ..EngineConfig::default()
        };
        let near_value = engine_with(config.clone()).root_value(&near);
        let far_value = engine_with(config).root_value(&far);
        assert!(near_value > far_value);
        assert!(near_value > 100_000);
    }

    #[test]
    fn test_largest_valid_win_score_keeps_lost_value_exact() {
        let config = EngineConfig {
            search_depth: 2,
            win_score: INFINITY - i32::from(u8::MAX) - 1,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));

        // Second player to move, no walls, and the first player wins next turn
        let mut state = GameState::default();
        state.players[0].position = Position::new(1, 0);
        state.players[1].position = Position::new(4, 0);
        state.players[1].walls_remaining = 0;
        state.current = 1;

        for form in [SearchForm::Negamax, SearchForm::Minimax] {
            let config = EngineConfig {
                search_form: form,
                ..config.clone()
            };
            let mut engine = engine_with(config.clone());
            assert_eq!(engine.root_value(&state), -config.win_score, "{form:?}");
            let (mv, _) = engine.search(&state).unwrap();
            assert!(mv.is_step());
        }
    }

    #[test]
    fn test_oscillation_memory() {
        let mut engine = engine_with(EngineConfig::default());
        let mut state = GameState::default();
        for _ in 0..6 {
            let (mv, _) = engine.search(&state).unwrap();
            assert_eq!(state.play(mv), Ok(()));
            if state.is_over() {
                break;
            }
        }
        assert!(engine.recent_destinations().count() <= 4);
        engine.reset_memory();
        assert_eq!(engine.recent_destinations().count(), 0);
    }

    #[test]
    fn test_no_move_when_game_is_over() {
        let mut state = GameState::default();
        state.players[0].position = Position::new(0, 4);
        state.status = GameStatus::Won(0);
        let mut engine = engine_with(EngineConfig::default());
        assert!(engine.search(&state).is_none());
    }
}
