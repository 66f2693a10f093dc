//! Region and tunnel generation endpoints

use crate::state::ServerState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RegionsRequest {
    pub count: Option<usize>,
    pub seed: Option<u64>,
}

/// Re-partition the board into regions
pub async fn generate_regions(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<RegionsRequest>,
) -> (StatusCode, Json<Value>) {
    let count = req.count.unwrap_or(state.config().region_count);

    match state.regenerate_regions(count, req.seed) {
        Ok(map) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "seeds": map.seeds,
                "sizes": map.sizes,
            })),
        ),
        Err(e) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))),
    }
}

#[derive(Deserialize)]
pub struct TunnelRequest {
    pub size: Option<usize>,
    pub failure_ceiling: Option<u32>,
    pub seed: Option<u64>,
}

/// Carve a tunnel and overlay it on the scene.
///
/// Generation runs on the blocking pool; the world is only locked to take
/// a snapshot and to install the result, so ticks keep running meanwhile.
pub async fn generate_tunnel(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<TunnelRequest>,
) -> (StatusCode, Json<Value>) {
    let config = state.config();
    let size = req.size.unwrap_or(config.tunnel_size);
    let ceiling = req.failure_ceiling.unwrap_or(config.tunnel_failure_ceiling);

    let job = match state.prepare_tunnel(size, ceiling, req.seed) {
        Ok(job) => job,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))),
    };

    match tokio::task::spawn_blocking(move || job.run()).await {
        Ok(Ok(tunnel)) => {
            let cells = state.install_tunnel(tunnel);
            (
                StatusCode::OK,
                Json(json!({ "success": true, "cells": cells })),
            )
        }
        Ok(Err(e)) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))),
        Err(e) => {
            tracing::error!("Tunnel task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Tunnel task failed: {}", e) })),
            )
        }
    }
}
