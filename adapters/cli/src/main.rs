#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that simulates one attack against a board snapshot.

mod documents;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use breach_sim_core::{ArenaSize, GameConfig, UnitCatalog, DEFAULT_ARENA_SIZE};
use breach_sim_engine::{simulate_with_options, SimulationOptions};
use clap::Parser;
use serde::de::DeserializeOwned;

use crate::documents::{AttackDocument, BoardDocument};

/// Simulates one attack round and prints the aggregate result as JSON.
#[derive(Parser, Debug)]
#[command(name = "breach-sim")]
#[command(about = "Simulate an attack against a board snapshot and print the result as JSON")]
struct Args {
    /// Board snapshot document listing every stationary unit.
    #[arg(long)]
    board: PathBuf,

    /// Attack document listing every mobile unit.
    #[arg(long)]
    attack: PathBuf,

    /// Game configuration with the unit information table.
    #[arg(long)]
    config: PathBuf,

    /// Side length of the square that inscribes the arena.
    #[arg(long, default_value_t = DEFAULT_ARENA_SIZE)]
    arena_size: u32,

    /// Only let self-destructs deal damage after the required number of steps.
    #[arg(long)]
    enforce_self_destruct_steps: bool,

    /// Pretty-print the result document.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let output = run(&args)?;
    println!("{output}");
    Ok(())
}

fn run(args: &Args) -> Result<String> {
    let arena = ArenaSize::new(args.arena_size).context("invalid --arena-size")?;
    let config: GameConfig = read_json(&args.config)?;
    let catalog = UnitCatalog::from_config(&config).context("game config is incomplete")?;

    let board = read_json::<BoardDocument>(&args.board)?.into_board(arena, &catalog)?;
    let roster = read_json::<AttackDocument>(&args.attack)?.into_roster(arena, &catalog)?;
    log::info!(
        "simulating {} mobile units against {} structures",
        roster.len(),
        board.len()
    );

    let options = SimulationOptions {
        enforce_self_destruct_steps: args.enforce_self_destruct_steps,
    };
    let result = simulate_with_options(board, roster, options).context("simulation aborted")?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    };
    rendered.context("failed to serialize the simulation result")
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}
