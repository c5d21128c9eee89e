use crate::engine::config::EngineConfig;
use crate::engine::{fallback_step, Move, SearchStats, Strategy};
use crate::logic::board::{Position, WALL_LATTICE};
use crate::logic::game::GameState;
use crate::logic::wall::{Orientation, Wall};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn random_wall(rng: &mut StdRng, state: &GameState, attempts: u32) -> Option<Wall> {
    if !state.current_player().can_place_wall() {
        return None;
    }
    (0..attempts).find_map(|_| {
        let wall = Wall::new(
            rng.gen_range(0..WALL_LATTICE),
            rng.gen_range(0..WALL_LATTICE),
            Orientation::from_horizontal(rng.gen()),
        );
        state
            .board
            .can_place_wall(&wall, &state.players)
            .then_some(wall)
    })
}

fn stats(nodes: u32) -> SearchStats {
    SearchStats {
        depth: 1,
        nodes,
        time_ms: 0,
    }
}

/// Easy: an occasional random wall, otherwise the step that gains the most rows.
pub struct ShallowGreedy {
    config: Arc<EngineConfig>,
    rng: StdRng,
}

impl ShallowGreedy {
    pub fn new(config: Arc<EngineConfig>, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for ShallowGreedy {
    fn search(&mut self, state: &GameState) -> Option<(Move, SearchStats)> {
        if state.is_over() {
            return fallback_step(state).map(|mv| (mv, stats(0)));
        }
        let attempts = self.config.easy_wall_attempts;

        // 1. Sometimes a wall
        if self.rng.gen::<f64>() < self.config.easy_wall_probability {
            if let Some(wall) = random_wall(&mut self.rng, state, attempts) {
                log::debug!("easy: random wall {wall}");
                return Some((Move::Wall(wall), stats(attempts)));
            }
        }

        // 2. Closest step by rows
        let goal_row = state.current_player().goal_row;
        let steps = state.valid_steps();
        let nodes = u32::try_from(steps.len()).unwrap_or(u32::MAX);
        if let Some(to) = steps.into_iter().min_by_key(|to| to.row.abs_diff(goal_row)) {
            return Some((Move::Step(to), stats(nodes)));
        }

        // 3. Boxed in: any wall will do
        if let Some(wall) = random_wall(&mut self.rng, state, attempts) {
            return Some((Move::Wall(wall), stats(attempts)));
        }
        fallback_step(state).map(|mv| (mv, stats(0)))
    }
}

/// Medium: looks one move ahead on path lengths.
pub struct OnePlyGreedy {
    config: Arc<EngineConfig>,
    rng: StdRng,
}

impl OnePlyGreedy {
    pub fn new(config: Arc<EngineConfig>, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    // Best wall near the opponent by their path increase, scanning horizontals first.
    fn best_wall(&self, state: &GameState, opp_path: u32, nodes: &mut u32) -> Option<Wall> {
        let opp = state.opponent_index();
        let Position { row, col } = state.opponent().position;
        let radius = self.config.medium_wall_radius;
        let last = WALL_LATTICE - 1;

        let mut best: Option<(Wall, u32)> = None;
        for orientation in Orientation::ALL {
            for r in row.saturating_sub(radius)..=row.saturating_add(radius).min(last) {
                for c in col.saturating_sub(radius)..=col.saturating_add(radius).min(last) {
                    let wall = Wall::new(r, c, orientation);
                    *nodes += 1;
                    let Ok(lengths) = state.board.probe_wall(&wall, &state.players) else {
                        continue;
                    };
                    let increase = lengths[opp].saturating_sub(opp_path);
                    if best.map_or(true, |(_, top)| increase > top) {
                        best = Some((wall, increase));
                    }
                }
            }
        }

        best.filter(|&(_, increase)| increase > 0).map(|(wall, _)| wall)
    }
}

impl Strategy for OnePlyGreedy {
    fn search(&mut self, state: &GameState) -> Option<(Move, SearchStats)> {
        if state.is_over() {
            return fallback_step(state).map(|mv| (mv, stats(0)));
        }
        let mover = state.current_player();
        let mut nodes = 0;

        // 1. Wall unless comfortably ahead in the race
        if let (Some(own), Some(opp)) = (
            state.path_length(state.current),
            state.path_length(state.opponent_index()),
        ) {
            let behind = i64::from(own) - i64::from(opp);
            if behind >= i64::from(self.config.medium_ahead_margin) && mover.can_place_wall() {
                if let Some(wall) = self.best_wall(state, opp, &mut nodes) {
                    log::debug!("medium: wall {wall} after {nodes} probes");
                    return Some((Move::Wall(wall), stats(nodes)));
                }
            }
        }

        let steps = state.valid_steps();

        // 2. Immediate win
        if let Some(&win) = steps.iter().find(|to| to.row == mover.goal_row) {
            return Some((Move::Step(win), stats(nodes)));
        }

        // 3. Shortest resulting path
        let best_step = steps
            .iter()
            .filter_map(|&to| {
                nodes += 1;
                state
                    .board
                    .get_shortest_path_length(to, mover.goal_row)
                    .map(|len| (to, len))
            })
            .min_by_key(|&(_, len)| len);
        if let Some((to, _)) = best_step {
            return Some((Move::Step(to), stats(nodes)));
        }

        // 4. Anything legal
        if let Some(&to) = steps.choose(&mut self.rng) {
            return Some((Move::Step(to), stats(nodes)));
        }
        fallback_step(state).map(|mv| (mv, stats(nodes)))
    }
}
