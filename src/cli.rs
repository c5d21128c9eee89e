use clap::{Args, Parser, Subcommand};
use quoridor_core::engine::Difficulty;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version)]
#[command(name = "quoridor")]
#[command(about = "Quoridor rules engine and AI players", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Let two AI players play a game out
    Play(PlayCommand),
    /// Print a saved game with path lengths and legal moves
    Show(ShowCommand),
}

#[derive(Args)]
pub struct PlayCommand {
    /// Tier for the first player (blue, starts at the bottom)
    #[arg(long, default_value = "hard")]
    pub first: Difficulty,

    /// Tier for the second player (red, starts at the top)
    #[arg(long, default_value = "medium")]
    pub second: Difficulty,

    /// Seed for the randomized tiers; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overrides the search depth from the config
    #[arg(short, long)]
    pub depth: Option<u8>,

    /// Engine config JSON
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Continue from a saved game
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Write the final position here
    #[arg(long)]
    pub save: Option<PathBuf>,

    #[arg(long, default_value_t = 200)]
    pub max_plies: u32,

    /// Print the board after every move
    #[arg(long)]
    pub show: bool,
}

#[derive(Args)]
pub struct ShowCommand {
    pub path: PathBuf,
}
