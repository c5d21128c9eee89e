use anyhow::{Context, Result};
use clap::Parser;
use quoridor_core::engine::config::EngineConfig;
use quoridor_core::engine::{create_strategy, Strategy};
use quoridor_core::logic::game::GameState;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

use cli::{Cli, Commands, PlayCommand, ShowCommand};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Play(args) => play(args),
        Commands::Show(args) => show(args),
    }
}

fn load_config(args: &PlayCommand) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::load_from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(depth) = args.depth {
        config.search_depth = depth;
    }
    config.validate()?;
    Ok(config)
}

fn load_game(path: &Path) -> Result<GameState> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading save {}", path.display()))?;
    GameState::from_json(&json).with_context(|| format!("loading save {}", path.display()))
}

fn play(args: &PlayCommand) -> Result<()> {
    let config = Arc::new(load_config(args)?);
    let mut game = match &args.load {
        Some(path) => load_game(path)?,
        None => GameState::new(format!("Blue ({})", args.first), format!("Red ({})", args.second)),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "{} vs {}", args.first, args.second);

    let mut players: [Box<dyn Strategy>; 2] = [
        create_strategy(args.first, config.clone(), seed),
        create_strategy(args.second, config, seed.wrapping_add(1)),
    ];

    for ply in 0..args.max_plies {
        if game.is_over() {
            break;
        }
        let name = game.current_player().name.clone();
        let Some(strategy) = players.get_mut(game.current) else {
            break;
        };
        let Some((mv, stats)) = strategy.search(&game) else {
            tracing::warn!("{name} has no move");
            break;
        };
        game.play(mv)
            .with_context(|| format!("{name} chose an illegal move {mv}"))?;
        tracing::info!(ply, nodes = stats.nodes, time_ms = stats.time_ms, "{name}: {mv}");

        if args.show {
            println!("{}", render::board(&game));
        }
    }

    match game.winner() {
        Some(winner) => println!("{} wins after {} plies", winner.name, game.history.len()),
        None => println!("No winner after {} plies", game.history.len()),
    }

    if let Some(path) = &args.save {
        fs::write(path, game.to_json()?)
            .with_context(|| format!("writing save {}", path.display()))?;
        tracing::info!("Saved game to {}", path.display());
    }
    Ok(())
}

fn show(args: &ShowCommand) -> Result<()> {
    let game = load_game(&args.path)?;
    println!("{}", render::board(&game));

    for (idx, player) in game.players.iter().enumerate() {
        let path = game
            .path_length(idx)
            .map_or_else(|| "unreachable".to_string(), |d| d.to_string());
        println!(
            "{} at {}: path {path}, {} walls left",
            player.name, player.position, player.walls_remaining
        );
    }

    if let Some(winner) = game.winner() {
        println!("{} has won", winner.name);
    } else {
        let steps: Vec<String> = game.valid_steps().iter().map(ToString::to_string).collect();
        println!(
            "{} to move: steps {}, {} legal walls",
            game.current_player().name,
            steps.join(" "),
            game.get_valid_wall_positions().len()
        );
    }
    Ok(())
}
