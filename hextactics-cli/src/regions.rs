//! Regions command - partition a grid and print the result
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_grid(), partition(), report()
//! - Level 3: region_glyph()
//! - Level 4: command arguments

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::json;

use hextactics_core::{GameConfig, HexGrid, RegionId, RegionMap};

use crate::config::{load_config, make_rng};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RegionsArgs {
    /// Number of regions (default: from config)
    #[arg(long)]
    pub count: Option<usize>,

    /// Grid rows (default: from config)
    #[arg(long)]
    pub rows: Option<usize>,

    /// Grid columns (default: from config)
    #[arg(long)]
    pub columns: Option<usize>,

    /// Game config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run regions command
///
/// 1. Load config and build an empty grid
/// 2. Partition it
/// 3. Print the map
pub fn run(args: RegionsArgs, seed: Option<u64>) -> Result<()> {
    let config = load_config(args.config.as_deref(), seed)?;
    let mut grid = build_grid(&config, args.rows, args.columns)?;
    let count = args.count.unwrap_or(config.region_count);

    let map = partition(&config, &mut grid, count)?;
    tracing::info!("Partitioned {} cells into {} regions", grid.len(), map.region_count());

    report(&grid, &map, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

pub(crate) fn build_grid(
    config: &GameConfig,
    rows: Option<usize>,
    columns: Option<usize>,
) -> Result<HexGrid> {
    Ok(HexGrid::new(
        rows.unwrap_or(config.rows),
        columns.unwrap_or(config.columns),
        config.hex_size,
    )?)
}

fn partition(config: &GameConfig, grid: &mut HexGrid, count: usize) -> Result<RegionMap> {
    let mut rng = make_rng(config);
    let generator = hextactics_core::RegionGenerator::new(count);
    Ok(generator.generate(grid, &mut rng)?)
}

fn report(grid: &HexGrid, map: &RegionMap, as_json: bool) -> Result<()> {
    if as_json {
        let cells: Vec<_> = grid
            .cells()
            .map(|cell| json!({ "hex": cell.hex, "region": cell.region() }))
            .collect();
        let out = json!({ "seeds": map.seeds, "sizes": map.sizes, "cells": cells });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print!(
        "{}",
        crate::ascii::render(grid, |hex| grid
            .region_of(hex)
            .ok()
            .flatten()
            .map(region_glyph)
            .unwrap_or('.'))
    );
    println!();
    for (index, size) in map.sizes.iter().enumerate() {
        let id = RegionId(index as u16);
        println!("{} {}: {} cells, seed {:?}", region_glyph(id), id, size, map.seeds[index]);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// A-Z, then a-z, then '?'
fn region_glyph(region: RegionId) -> char {
    let index = region.0 as u8;
    match region.0 {
        0..=25 => (b'A' + index) as char,
        26..=51 => (b'a' + index - 26) as char,
        _ => '?',
    }
}

// ============================================================================
// TESTS
// ============================================================================
