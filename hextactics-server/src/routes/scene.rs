//! Scene snapshot endpoint

use crate::state::ServerState;
use axum::{extract::State, Json};
use hextactics_core::Scene;
use std::sync::Arc;

/// Latest scene published by the tick loop
pub async fn get_scene(State(state): State<Arc<ServerState>>) -> Json<Scene> {
    Json(state.scene().as_ref().clone())
}
