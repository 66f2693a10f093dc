//! Error types for grid, generator and placement operations

use thiserror::Error;

use crate::entity::EntityId;
use crate::grid::Hex;

/// Errors raised by the core engine.
///
/// `UnreachableSelection` and `GenerationStalled` are absorbed inside the
/// core (a no-op transition and a tunnel restart respectively); callers of
/// the public API only ever observe the remaining variants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("cell ({row}, {col}) is outside the {rows}x{columns} grid")]
    OutOfBounds {
        row: i32,
        col: i32,
        rows: usize,
        columns: usize,
    },

    #[error("click referenced unresolvable cell ({}, {})", .0.row, .0.col)]
    UnreachableSelection(Hex),

    #[error("tunnel growth stalled after {failures} consecutive failures")]
    GenerationStalled { failures: u32 },

    #[error("cannot partition {cells} cells into {requested} regions")]
    InvalidRegionCount { requested: usize, cells: usize },

    #[error("cannot carve a tunnel of {requested} cells from {cells} cells")]
    InvalidTunnelSize { requested: usize, cells: usize },

    #[error("failure ceiling {requested} is below the minimum of {minimum} for this tunnel")]
    InvalidFailureCeiling { requested: u32, minimum: u32 },

    #[error("more than one unit spawns at cell ({row}, {col})")]
    DuplicateSpawn { row: i32, col: i32 },

    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message() {
        let err = GridError::OutOfBounds {
            row: 7,
            col: -1,
            rows: 5,
            columns: 5,
        };
        assert_eq!(err.to_string(), "cell (7, -1) is outside the 5x5 grid");
    }

    #[test]
    fn test_unreachable_selection_message() {
        let err = GridError::UnreachableSelection(Hex::new(9, 9));
        assert_eq!(err.to_string(), "click referenced unresolvable cell (9, 9)");
    }

    #[test]
    fn test_duplicate_spawn_message() {
        let err = GridError::DuplicateSpawn { row: 1, col: 0 };
        assert_eq!(err.to_string(), "more than one unit spawns at cell (1, 0)");
    }
}
