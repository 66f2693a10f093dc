//! HEXTACTICS Server - HTTP front end and fixed-rate tick loop
//!
//! This crate provides the composition root for a running game:
//! - Fixed-rate tick task (drain input, update animations, publish scene)
//! - REST API for input, scene snapshots and board geometry
//! - Region and tunnel generation endpoints
//! - Static file serving for a browser renderer

mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use hextactics_core::GameConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use state::{ServerState, TickReport, TunnelJob, WorldStatus};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    pub game: GameConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            static_dir: "hextactics/renderer".to_string(),
            game: GameConfig::default(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Board geometry
        .route("/api/board", get(routes::board::get_board))
        // Rendering
        .route("/api/scene", get(routes::scene::get_scene))
        // Input
        .route("/api/input", post(routes::input::post_input))
        // Generators
        .route("/api/regions", post(routes::generate::generate_regions))
        .route("/api/tunnel", post(routes::generate::generate_tunnel))
        // Tick control
        .route("/api/pause", post(routes::control::pause))
        .route("/api/resume", post(routes::control::resume))
        // Shared state
        .with_state(state)
        // Static file serving (must be last)
        .fallback_service(static_service)
        // Renderers may be served from another origin
        .layer(CorsLayer::permissive())
}

/// Spawn the fixed-rate tick task
pub fn spawn_tick_loop(state: Arc<ServerState>) -> JoinHandle<()> {
    let hz = state.config().tick_hz.max(1);
    let period = Duration::from_secs_f64(1.0 / f64::from(hz));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let report = state.tick();
            if report.completed_moves > 0 {
                tracing::debug!(
                    tick = report.tick,
                    completed = report.completed_moves,
                    "moves completed"
                );
            }
        }
    })
}

/// Start the tick loop and the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new(config.game.clone())?);
    let ticker = spawn_tick_loop(Arc::clone(&state));
    let router = create_router(&config, state);

    tracing::info!("HEXTACTICS Server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);
    tracing::info!("Ticking at {} Hz", config.game.tick_hz);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, router).await;
    ticker.abort();
    served?;

    Ok(())
}
