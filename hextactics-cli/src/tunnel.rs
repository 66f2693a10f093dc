//! Tunnel command - carve a tunnel and print it

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::json;

use hextactics_core::TunnelGenerator;

use crate::config::{load_config, make_rng};
use crate::regions::build_grid;

#[derive(Args)]
pub struct TunnelArgs {
    /// Tunnel length in cells (default: from config)
    #[arg(long)]
    pub size: Option<usize>,

    /// Consecutive failed growth attempts before restarting
    #[arg(long)]
    pub failure_ceiling: Option<u32>,

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

pub fn run(args: TunnelArgs, seed: Option<u64>) -> Result<()> {
    let config = load_config(args.config.as_deref(), seed)?;
    let grid = build_grid(&config, args.rows, args.columns)?;

    let generator = TunnelGenerator::new(args.size.unwrap_or(config.tunnel_size))
        .with_failure_ceiling(args.failure_ceiling.unwrap_or(config.tunnel_failure_ceiling));
    generator.validate(&grid)?;
    let tunnel = generator.generate(&grid, &mut make_rng(&config))?;
    tracing::info!("Carved tunnel of {} cells", tunnel.len());

    if args.json {
        let mut cells: Vec<_> = tunnel.iter().copied().collect();
        cells.sort();
        println!("{}", serde_json::to_string_pretty(&json!({ "cells": cells }))?);
    } else {
        print!(
            "{}",
            crate::ascii::render(&grid, |hex| if tunnel.contains(&hex) { '#' } else { '.' })
        );
    }
    Ok(())
}
