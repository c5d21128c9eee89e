use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::game::{GameState, GameStatus};
use std::sync::Arc;

/// Path length charged for a pawn that cannot reach its goal. Longer than any real path.
pub const UNREACHABLE_PATH: i32 = 81;

#[must_use]
pub fn path_or_penalty(length: Option<u32>) -> i32 {
    length
        .and_then(|d| i32::try_from(d).ok())
        .unwrap_or(UNREACHABLE_PATH)
}

pub struct PathEvaluator {
    config: Arc<EngineConfig>,
}

impl PathEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    // Scored for the player to move, so both sides see the same position
    // with opposite signs.
    fn score_for_mover(&self, state: &GameState) -> i32 {
        let me = state.current;
        let opp = state.opponent_index();
        let own_path = path_or_penalty(state.path_length(me));
        let opp_path = path_or_penalty(state.path_length(opp));

        // 1. One step from the goal dominates everything else
        if own_path == 1 {
            return self.config.near_win_score;
        }
        if opp_path == 1 {
            return -self.config.near_win_score;
        }

        // 2. Race, then walls in hand, then raw rows
        let (mover, other) = (&state.players[me], &state.players[opp]);
        let walls = i32::from(mover.walls_remaining) - i32::from(other.walls_remaining);
        let rows = i32::from(other.row_distance()) - i32::from(mover.row_distance());

        self.config.path_weight * (opp_path - own_path)
            + self.config.wall_weight * walls
            + self.config.row_weight * rows
    }
}

impl Evaluator for PathEvaluator {
    fn evaluate(&self, state: &GameState, side: usize) -> i32 {
        if let GameStatus::Won(winner) = state.status {
            return if winner == side {
                self.config.win_score
            } else {
                -self.config.win_score
            };
        }

        let score = self.score_for_mover(state);
        if side == state.current {
            score
        } else {
            -score
        }
    }
}
