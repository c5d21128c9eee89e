pub mod board;
pub mod game;
pub mod player;
pub mod rules;
pub mod snapshot;
pub mod wall;
