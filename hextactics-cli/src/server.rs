//! Serve command - host the tick loop and HTTP API
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: load_config(), check_renderer_dir()
//! - Level 4: command arguments

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use hextactics_server::{run_server, ServerConfig};

use crate::config::load_config;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port for the API and renderer files
    #[arg(long, default_value = "8003")]
    pub port: u16,

    /// Browser renderer assets, served for any path outside /api
    #[arg(long, default_value = "hextactics/renderer")]
    pub static_dir: PathBuf,

    /// Game config JSON file (grid shape, roster, tick rate)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Draw in-flight move paths in the scene
    #[arg(long)]
    pub debug_paths: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// 1. Merge config file, seed and flags
/// 2. Serve until the process is stopped
pub fn run(args: ServerArgs, seed: Option<u64>) -> Result<()> {
    let config = configure_server(&args, seed)?;

    tracing::info!(
        port = config.port,
        rows = config.game.rows,
        columns = config.game.columns,
        tick_hz = config.game.tick_hz,
        "serving game"
    );

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn configure_server(args: &ServerArgs, seed: Option<u64>) -> Result<ServerConfig> {
    check_renderer_dir(&args.static_dir)?;

    let mut game = load_config(args.config.as_deref(), seed)?;
    game.debug_paths |= args.debug_paths;
    game.validate()?;

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
        game,
    })
}

/// Blocks on the server future; the tick task lives on the same runtime
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_server(config))
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// A missing renderer only disables the static routes; a file in its place is an error
fn check_renderer_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Renderer directory {} not found; only /api routes will answer",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!("Renderer path is not a directory: {}", path.display());
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
