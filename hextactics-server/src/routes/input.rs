//! Pointer input endpoint
//!
//! Events are queued and applied on the next tick, never inside the request.

use crate::state::ServerState;
use axum::{extract::State, http::StatusCode, Json};
use hextactics_core::InputEvent;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// A single event or a batch in arrival order
#[derive(Deserialize)]
#[serde(untagged)]
pub enum InputRequest {
    One(InputEvent),
    Many(Vec<InputEvent>),
}

pub async fn post_input(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<InputRequest>,
) -> (StatusCode, Json<Value>) {
    let events = match req {
        InputRequest::One(event) => vec![event],
        InputRequest::Many(events) => events,
    };

    let mut queued = 0;
    for event in events {
        if !state.submit(event) {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "Input queue closed", "queued": queued })),
            );
        }
        queued += 1;
    }

    (StatusCode::ACCEPTED, Json(json!({ "success": true, "queued": queued })))
}
