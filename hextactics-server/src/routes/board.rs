//! Board geometry endpoint

use crate::state::ServerState;
use axum::{extract::State, Json};
use hextactics_core::{Hex, Point, RegionId};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct CellInfo {
    pub hex: Hex,
    pub center: Point,
    pub vertices: Vec<Point>,
    pub region: Option<RegionId>,
}

#[derive(Serialize)]
pub struct BoardInfo {
    pub rows: usize,
    pub columns: usize,
    pub hex_size: f64,
    pub extent: Point,
    pub cells: Vec<CellInfo>,
}

/// Get board geometry and region tags
pub async fn get_board(State(state): State<Arc<ServerState>>) -> Json<BoardInfo> {
    let info = state.with_game(|game| {
        let grid = game.grid();
        BoardInfo {
            rows: grid.rows(),
            columns: grid.columns(),
            hex_size: grid.hex_size(),
            extent: grid.pixel_extent(),
            cells: grid
                .cells()
                .map(|cell| CellInfo {
                    hex: cell.hex,
                    center: cell.center(),
                    vertices: cell.boundary().to_vec(),
                    region: cell.region(),
                })
                .collect(),
        }
    });
    Json(info)
}
