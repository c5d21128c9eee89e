use crate::engine::config::EngineConfig;
use crate::engine::eval::path_or_penalty;
use crate::engine::move_list::{MoveList, ScoredMove};
use crate::engine::Move;
use crate::logic::board::{Position, WALL_LATTICE};
use crate::logic::game::GameState;
use crate::logic::wall::{Orientation, Wall};
use std::cmp::Reverse;

/// Candidate moves for the adversarial search, filtered and ordered.
pub struct CandidateGen<'a> {
    config: &'a EngineConfig,
}

// A measured wall: opponent path increase, own path increase.
struct WallProbe {
    wall: Wall,
    opp_increase: u32,
    own_increase: u32,
}

impl<'a> CandidateGen<'a> {
    pub const fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Steps first, ordered by the mover's resulting path length, then the
    /// walls worth considering. A step onto the goal row is returned alone.
    #[must_use]
    pub fn generate(&self, state: &GameState) -> MoveList {
        let mut moves = MoveList::new();
        if state.is_over() {
            return moves;
        }

        let mover = state.current_player();
        let steps = state.valid_steps();

        // 1. Win short-circuit
        if let Some(&win) = steps.iter().find(|to| to.row == mover.goal_row) {
            moves.push(ScoredMove::new(Move::Step(win), 0));
            return moves;
        }

        // 2. Pawn steps
        for to in steps {
            let length = state.board.get_shortest_path_length(to, mover.goal_row);
            moves.push(ScoredMove::new(Move::Step(to), path_or_penalty(length)));
        }
        moves.sort_by(|a, b| a.score.cmp(&b.score));

        // 3. Walls
        for probe in self.wall_candidates(state) {
            let key = i32::try_from(probe.opp_increase).unwrap_or(i32::MAX);
            moves.push(ScoredMove::new(Move::Wall(probe.wall), key));
        }

        moves
    }

    fn walls_worth_trying(&self, state: &GameState, own_path: u32, opp_path: u32) -> bool {
        state.current_player().can_place_wall()
            && state.board.walls().len() >= self.config.early_game_walls
            && (opp_path <= self.config.wall_trigger_distance || own_path > opp_path)
    }

    fn wall_candidates(&self, state: &GameState) -> Vec<WallProbe> {
        let me = state.current;
        let opp = state.opponent_index();
        let (Some(own_path), Some(opp_path)) = (state.path_length(me), state.path_length(opp))
        else {
            return Vec::new();
        };
        if !self.walls_worth_trying(state, own_path, opp_path) {
            return Vec::new();
        }

        let mut probes: Vec<WallProbe> = self
            .wall_region(state)
            .into_iter()
            .filter_map(|wall| {
                let lengths = state.board.probe_wall(&wall, &state.players).ok()?;
                let opp_increase = lengths[opp].saturating_sub(opp_path);
                let own_increase = lengths[me].saturating_sub(own_path);
                (opp_increase > 0).then_some(WallProbe {
                    wall,
                    opp_increase,
                    own_increase,
                })
            })
            .collect();

        probes.sort_by_key(|p| (Reverse(p.opp_increase), p.own_increase));
        probes.truncate(self.config.max_wall_candidates);
        probes
    }

    /// Anchors in a box in front of the opponent, plus every wall that would
    /// cut the first steps of the opponent's shortest path. Deduplicated.
    fn wall_region(&self, state: &GameState) -> Vec<Wall> {
        let opponent = state.opponent();
        let mut seen: u128 = 0;
        let mut walls = Vec::new();
        let mut add = |wall: Wall| {
            if !wall.in_bounds() {
                return;
            }
            let bit = 1u128 << wall.lattice_index();
            if seen & bit == 0 {
                seen |= bit;
                walls.push(wall);
            }
        };

        // 1. Box toward the opponent's goal
        let Position { row, col } = opponent.position;
        let span = self.config.wall_row_span;
        let rows = if opponent.goal_row > row {
            row..row.saturating_add(span)
        } else {
            row.saturating_sub(span)..row
        };
        let radius = self.config.wall_col_radius;
        let cols = col.saturating_sub(radius)..=col.saturating_add(radius);

        for orientation in Orientation::ALL {
            for r in rows.clone().filter(|&r| r < WALL_LATTICE) {
                for c in cols.clone().filter(|&c| c < WALL_LATTICE) {
                    add(Wall::new(r, c, orientation));
                }
            }
        }

        // 2. Walls on the opponent's shortest path
        if let Some(path) = state
            .board
            .shortest_path(opponent.position, opponent.goal_row)
        {
            for pair in path.windows(2).take(self.config.path_lookahead) {
                if let [from, to] = *pair {
                    for wall in blocking_walls(from, to) {
                        add(wall);
                    }
                }
            }
        }

        walls
    }
}

/// The (up to two) wall anchors whose wall would sit on the edge between two
/// orthogonally adjacent cells.
fn blocking_walls(from: Position, to: Position) -> Vec<Wall> {
    let mut walls = Vec::with_capacity(2);
    if from.col == to.col {
        let row = from.row.min(to.row);
        walls.push(Wall::horizontal(row, from.col));
        if let Some(c) = from.col.checked_sub(1) {
            walls.push(Wall::horizontal(row, c));
        }
    } else {
        let col = from.col.min(to.col);
        walls.push(Wall::vertical(from.row, col));
        if let Some(r) = from.row.checked_sub(1) {
            walls.push(Wall::vertical(r, col));
        }
    }
    walls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(state: &GameState, config: &EngineConfig) -> MoveList {
        CandidateGen::new(config).generate(state)
    }

    #[test]
    fn test_winning_step_is_only_candidate() {
        let mut state = GameState::default();
        state.players[0].position = Position::new(1, 3);
        state.players[1].position = Position::new(5, 5);
        let moves = generate(&state, &EngineConfig::default());
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].mv, Move::Step(Position::new(0, 3)));
    }

    #[test]
    fn test_opening_has_only_steps() {
        // Opponent is 8 away and nobody is behind: walls are gated off
        let state = GameState::default();
        let moves = generate(&state, &EngineConfig::default());
        assert_eq!(moves.len(), 3);
        assert!(moves.iter().all(|m| m.mv.is_step()));
        assert_eq!(moves[0].mv, Move::Step(Position::new(7, 4)));
        assert_eq!(moves[0].score, 7);
    }

    #[test]
    fn test_walls_when_opponent_is_close() {
        let mut state = GameState::default();
        state.players[1].position = Position::new(5, 4);
        let config = EngineConfig::default();
        let moves = generate(&state, &config);

        let walls: Vec<_> = moves.iter().filter(|m| !m.mv.is_step()).collect();
        assert!(!walls.is_empty());
        assert!(walls.len() <= config.max_wall_candidates);
        // Steps come first
        assert!(moves.iter().take_while(|m| m.mv.is_step()).count() >= 3);
        // Ordered by descending opponent increase, and every one hurts
        for pair in walls.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(walls.iter().all(|m| m.score > 0));
        for wall in &walls {
            assert_eq!(state.validate(&wall.mv), Ok(()));
        }
    }

    #[test]
    fn test_wall_gates() {
        let mut state = GameState::default();
        state.players[1].position = Position::new(5, 4);

        let mut config = EngineConfig::default();
        config.early_game_walls = 2;
        assert!(generate(&state, &config).iter().all(|m| m.mv.is_step()));

        let config = EngineConfig::default();
        state.players[0].walls_remaining = 0;
        assert!(generate(&state, &config).iter().all(|m| m.mv.is_step()));
    }

    #[test]
    fn test_blocking_walls_cover_the_edge() {
        let from = Position::new(4, 4);
        for to in [
            Position::new(3, 4),
            Position::new(5, 4),
            Position::new(4, 3),
            Position::new(4, 5),
        ] {
            let walls = blocking_walls(from, to);
            assert_eq!(walls.len(), 2);
            for wall in walls {
                assert!(wall.blocks_movement(from, to), "{wall} should block {from}-{to}");
            }
        }
        assert_eq!(blocking_walls(Position::new(0, 0), Position::new(1, 0)).len(), 1);
    }
}
