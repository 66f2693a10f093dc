//! Tick loop control

use crate::state::ServerState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn pause(State(state): State<Arc<ServerState>>) -> Json<Value> {
    state.set_paused(true);
    Json(json!({ "success": true, "paused": true }))
}

pub async fn resume(State(state): State<Arc<ServerState>>) -> Json<Value> {
    state.set_paused(false);
    Json(json!({ "success": true, "paused": false }))
}
