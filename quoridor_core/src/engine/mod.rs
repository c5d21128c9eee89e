use crate::engine::config::EngineConfig;
use crate::logic::board::Position;
use crate::logic::game::GameState;
use crate::logic::wall::Wall;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub mod config;
pub mod eval;
pub mod greedy;
pub mod move_list;
pub mod movegen;
pub mod search;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Step(Position),
    Wall(Wall),
}

impl Move {
    #[must_use]
    pub const fn is_step(&self) -> bool {
        matches!(self, Self::Step(_))
    }

    #[must_use]
    pub const fn destination(&self) -> Option<Position> {
        match self {
            Self::Step(to) => Some(*to),
            Self::Wall(_) => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(to) => write!(f, "{to}"),
            Self::Wall(wall) => write!(f, "{wall}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u32,
    pub time_ms: u64,
}

/// Static evaluation of a non-terminal position from `side`'s point of view.
pub trait Evaluator {
    fn evaluate(&self, state: &GameState, side: usize) -> i32;
}

pub trait Strategy {
    /// Picks a move for the player to move. The caller's state is never mutated.
    fn search(&mut self, state: &GameState) -> Option<(Move, SearchStats)>;

    fn get_move(&mut self, state: &GameState) -> Option<Move> {
        self.search(state).map(|(mv, _)| mv)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

#[must_use]
pub fn create_strategy(
    difficulty: Difficulty,
    config: Arc<EngineConfig>,
    seed: u64,
) -> Box<dyn Strategy> {
    match difficulty {
        Difficulty::Easy => Box::new(greedy::ShallowGreedy::new(config, seed)),
        Difficulty::Medium => Box::new(greedy::OnePlyGreedy::new(config, seed)),
        Difficulty::Hard => Box::new(search::AlphaBetaEngine::new(config)),
    }
}

/// Last resort shared by every tier: the legal step closest to the goal row.
pub(crate) fn fallback_step(state: &GameState) -> Option<Move> {
    if state.is_over() {
        log::warn!("asked for a move after the game ended");
        return None;
    }
    let goal_row = state.current_player().goal_row;
    let step = state
        .valid_steps()
        .into_iter()
        .min_by_key(|to| to.row.abs_diff(goal_row));

    if step.is_none() {
        log::warn!("{} has no legal step", state.current_player().name);
    }
    step.map(Move::Step)
}
