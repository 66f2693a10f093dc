//! Demo command - drive one scripted move through the full tick pipeline
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: setup_game(), script_clicks(), run_ticks(), report()
//! - Level 3: parse_hex()
//! - Level 4: command arguments

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use hextactics_core::{
    ClickOutcome, EventQueue, GameConfig, GameState, Hex, InputEvent, Scene, SceneOptions,
};

use crate::config::{load_config, make_rng};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct DemoArgs {
    /// Cell holding the unit to move, as ROW,COL
    #[arg(long, default_value = "0,0", value_parser = parse_hex)]
    pub from: Hex,

    /// Destination cell, as ROW,COL
    #[arg(long, default_value = "0,1", value_parser = parse_hex)]
    pub to: Hex,

    /// Tick budget before giving up
    #[arg(long, default_value = "1000")]
    pub max_ticks: u64,

    /// Game config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the final scene as JSON
    #[arg(long)]
    pub json: bool,
}

/// What happened during the run
#[derive(Clone, Debug, Serialize)]
pub struct DemoReport {
    pub outcomes: Vec<ClickOutcome>,
    pub ticks: u64,
    pub completed_moves: usize,
    pub occupant_at_destination: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run demo command
///
/// 1. Build the game from config
/// 2. Queue a select click and a move click
/// 3. Tick until every animation finished
/// 4. Report
pub fn run(args: DemoArgs, seed: Option<u64>) -> Result<()> {
    let config = load_config(args.config.as_deref(), seed)?;
    let mut game = setup_game(&config)?;

    let mut queue = EventQueue::new();
    script_clicks(&game, &mut queue, args.from, args.to)?;

    let report = run_ticks(&mut game, &mut queue, args.to, args.max_ticks);
    tracing::info!(
        "Demo finished after {} ticks ({} moves completed)",
        report.ticks,
        report.completed_moves
    );

    if args.json {
        let scene = Scene::capture(
            &game,
            config.width,
            config.height,
            SceneOptions {
                tunnel: None,
                debug_paths: config.debug_paths,
            },
        );
        println!("{}", serde_json::to_string_pretty(&scene)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

pub(crate) fn setup_game(config: &GameConfig) -> Result<GameState> {
    let mut game = config.build_state()?;
    let mut rng = make_rng(config);
    config.region_generator().generate(game.grid_mut(), &mut rng)?;
    Ok(game)
}

/// Queue clicks at the pixel centers of both cells
pub(crate) fn script_clicks(game: &GameState, queue: &mut EventQueue, from: Hex, to: Hex) -> Result<()> {
    for hex in [from, to] {
        let center = game
            .grid()
            .center_of(hex)
            .with_context(|| format!("Cell ({}, {}) is not on the grid", hex.row, hex.col))?;
        queue.push(InputEvent::primary_down(center));
    }
    Ok(())
}

pub(crate) fn run_ticks(
    game: &mut GameState,
    queue: &mut EventQueue,
    destination: Hex,
    max_ticks: u64,
) -> DemoReport {
    let mut outcomes = Vec::new();
    let mut completed_moves = 0;
    let mut ticks = 0;

    while ticks < max_ticks {
        ticks += 1;
        for event in queue.drain() {
            outcomes.push(game.process_event(event));
        }
        completed_moves += game.update();
        if game.animations().is_empty() {
            break;
        }
    }

    DemoReport {
        outcomes,
        ticks,
        completed_moves,
        occupant_at_destination: game.placement().entity_at(destination).is_some(),
    }
}

fn print_report(report: &DemoReport) {
    println!("\n=== Demo ===");
    for (index, outcome) in report.outcomes.iter().enumerate() {
        println!("Click {}: {:?}", index + 1, outcome);
    }
    println!("Ticks: {}", report.ticks);
    println!("Completed moves: {}", report.completed_moves);
    println!("Destination occupied: {}", report.occupant_at_destination);
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Parse "ROW,COL"
fn parse_hex(s: &str) -> Result<Hex, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{}'", s))?;
    let row = row.trim().parse().map_err(|e| format!("bad row: {}", e))?;
    let col = col.trim().parse().map_err(|e| format!("bad column: {}", e))?;
    Ok(Hex::new(row, col))
}

// ============================================================================
// TESTS
// ============================================================================
