//! Example to run the HEXTACTICS server standalone
//!
//! Run with: cargo run -p hextactics-server --example run_server

use hextactics_core::GameConfig;
use hextactics_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ServerConfig {
        port: 8003,
        static_dir: "hextactics/renderer".to_string(),
        game: GameConfig {
            seed: Some(7),
            debug_paths: true,
            ..Default::default()
        },
    };

    println!("Starting HEXTACTICS server on port {}", config.port);
    println!("Static files from: {}", config.static_dir);
    println!("Scene snapshots at http://localhost:{}/api/scene", config.port);

    run_server(config).await
}
