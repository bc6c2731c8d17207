#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Treasure Hunt scenario to completion.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::info;
use treasure_hunt_rendering::{BoardView, JsonReport, Renderer, TextReport};
use treasure_hunt_system_turns::TurnEngine;
use treasure_hunt_world::query;

/// Simulates adventurers hunting for treasure on a scripted map.
#[derive(Debug, Parser)]
#[command(name = "treasure-hunt", version, about)]
struct Cli {
    /// Scenario file describing the map and the adventurers.
    input: PathBuf,

    /// Write the final report to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also print the final board (to stderr when `--json` is set).
    #[arg(long)]
    board: bool,

    /// Characters per cell when printing the board.
    #[arg(long, default_value_t = BoardView::DEFAULT_CELL_WIDTH)]
    cell_width: usize,

    /// Emit the report as JSON instead of scenario notation.
    #[arg(long)]
    json: bool,

    /// Verbose logging (-v for turns, -vv for every event).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Entry point for the Treasure Hunt command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let scenario = treasure_hunt_scenario::load(&cli.input)
        .with_context(|| format!("failed to load scenario {}", cli.input.display()))?;
    info!(
        "loaded {}x{} map with {} adventurers",
        scenario.grid().width(),
        scenario.grid().height(),
        scenario.recruits().len()
    );

    let board = if cli.board {
        Some(BoardView::new(cli.cell_width)?)
    } else {
        None
    };

    let simulation = TurnEngine::default().run(scenario.into_world());
    let world = simulation.world();
    info!(
        "finished after {} turns, {} events",
        query::turn(world),
        simulation.events().len()
    );

    let renderer: Box<dyn Renderer> = if cli.json {
        Box::new(JsonReport { pretty: true })
    } else {
        Box::new(TextReport)
    };
    let report = renderer.render(world)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &report)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!("report written to {}", path.display());
        }
        None => print!("{report}"),
    }

    if let Some(board) = board {
        let drawn = board.render(world)?;
        if cli.json {
            eprint!("{drawn}");
        } else {
            print!("{drawn}");
        }
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_secs()
        .try_init();
}
