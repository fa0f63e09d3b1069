#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates caverns and runs scripted simulations.

mod render;
mod script;
mod snapshot;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use cavern_core::{CellCoord, SimulationConfig};
use cavern_system_simulation::Simulation;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::{
    script::{parse_cell, parse_moves, Script},
    snapshot::WorldSnapshot,
};

/// Cellular-automaton caverns populated by monsters.
#[derive(Debug, Parser)]
#[command(name = "cavern", version, about)]
struct Cli {
    /// TOML file overriding the default configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Seed replacing the configured one.
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Generate the map and print it as ASCII.
    Map,
    /// Run the simulation for a number of ticks.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 20)]
    ticks: usize,
    /// Cell the player routes to on the first tick, as ROW,COL.
    #[arg(long, value_parser = parse_cell)]
    route: Option<CellCoord>,
    /// One move per tick: n, e, s, w to step, a to attack, . to idle.
    #[arg(long, default_value = "")]
    moves: String,
    /// Print a JSON snapshot instead of the ASCII frame.
    #[arg(long)]
    json: bool,
}

/// Entry point for the Cavern command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    match cli.command {
        CliCommand::Map => {
            let simulation = build(&config)?;
            print!(
                "{}",
                render::terrain(cavern_world::query::grid(simulation.world()))
            );
        }
        CliCommand::Run(args) => run(&config, args)?,
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn build(config: &SimulationConfig) -> Result<Simulation> {
    Simulation::new(config).context("failed to set up the simulation")
}

fn run(config: &SimulationConfig, args: RunArgs) -> Result<()> {
    let moves = parse_moves(&args.moves).context("invalid --moves script")?;
    let script = Script::new(args.route, moves);
    let mut simulation = build(config)?;
    let mut events = Vec::new();

    for tick in 0..args.ticks {
        simulation.step(&script.inputs(tick), &mut events);
        for event in events.drain(..) {
            tracing::debug!(?event, "world event");
        }
    }

    if args.json {
        let json = WorldSnapshot::capture(simulation.world())
            .to_json()
            .context("failed to encode the world snapshot")?;
        println!("{json}");
    } else {
        print!("{}", render::scene(simulation.world()));
    }

    Ok(())
}
