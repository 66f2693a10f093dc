//! HEXTACTICS CLI - Command-line interface
//!
//! Commands:
//! - serve: Start the tick loop and HTTP server
//! - regions: Partition a grid into regions and print the map
//! - tunnel: Carve a tunnel and print it
//! - demo: Run a scripted move headlessly

mod ascii;
mod config;
mod demo;
mod regions;
mod server;
mod tunnel;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hextactics")]
#[command(about = "HEXTACTICS hex grid tactics prototype")]
struct Cli {
    /// Random seed for generators (default: entropy)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the game server
    Serve(server::ServerArgs),
    /// Print a region partition
    Regions(regions::RegionsArgs),
    /// Print a carved tunnel
    Tunnel(tunnel::TunnelArgs),
    /// Run a scripted move without a renderer
    Demo(demo::DemoArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => server::run(args, cli.seed),
        Commands::Regions(args) => regions::run(args, cli.seed),
        Commands::Tunnel(args) => tunnel::run(args, cli.seed),
        Commands::Demo(args) => demo::run(args, cli.seed),
    }
}
