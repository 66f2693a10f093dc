//! Placeable entities
//!
//! Only units exist today; further kinds (structures, terrain features)
//! become new `Entity` variants without touching the placement ledger.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Point};

/// Ledger-assigned entity identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity-{}", self.0)
    }
}

/// Name of the sprite image, resolved by the renderer
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetHandle(pub String);

impl AssetHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// On-screen size of a sprite in pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A unit with a sprite
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub asset: AssetHandle,
    pub extent: Extent,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Unit(Unit),
}

impl Entity {
    pub fn unit(asset: impl Into<String>, extent: Extent) -> Self {
        Entity::Unit(Unit {
            asset: AssetHandle::new(asset),
            extent,
        })
    }

    pub fn asset(&self) -> &AssetHandle {
        match self {
            Entity::Unit(unit) => &unit.asset,
        }
    }

    pub fn extent(&self) -> Extent {
        match self {
            Entity::Unit(unit) => unit.extent,
        }
    }

    /// Top-left pixel at which the sprite appears centered in `cell`
    pub fn centered_position(&self, cell: &Cell) -> Point {
        let extent = self.extent();
        cell.center() - Point::new(extent.width / 2.0, extent.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::HexGrid;

    #[test]
    fn test_centered_position() {
        let grid = HexGrid::new(2, 2, 100.0).unwrap();
        let cell = grid.cell_at(0, 0).unwrap();
        let entity = Entity::unit("soldier_1.png", Extent::new(40.0, 60.0));

        let pos = entity.centered_position(cell);
        assert!((pos.x - (150.0 - 20.0)).abs() < 1e-9);
        assert!((pos.y - (cell.center().y - 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_entity_serializes_with_kind_tag() {
        let entity = Entity::unit("crab_2.png", Extent::new(64.0, 64.0));
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["kind"], "unit");
        assert_eq!(json["asset"], "crab_2.png");
    }
}
