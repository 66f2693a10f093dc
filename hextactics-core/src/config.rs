//! Game configuration
//!
//! Loaded from JSON; every field has a default so partial files work.

use std::path::Path;

use anyhow::Context;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::animation::DEFAULT_TOTAL_STEPS;
use crate::entity::{Entity, Extent};
use crate::error::{GridError, Result};
use crate::game::{GameState, DEFAULT_HIGHLIGHT_DEPTH};
use crate::grid::{Hex, HexGrid, DEFAULT_HEX_SIZE};
use crate::placement::EntityPlacement;
use crate::region::RegionGenerator;
use crate::tunnel::{TunnelGenerator, DEFAULT_FAILURE_CEILING};

/// A unit placed when the game starts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitSpawn {
    pub asset: String,
    pub row: i32,
    pub col: i32,
    #[serde(default = "default_sprite_extent")]
    pub extent: Extent,
}

impl UnitSpawn {
    pub fn new(asset: &str, row: i32, col: i32) -> Self {
        Self {
            asset: asset.to_string(),
            row,
            col,
            extent: default_sprite_extent(),
        }
    }
}

fn default_sprite_extent() -> Extent {
    Extent::new(64.0, 64.0)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub columns: usize,
    /// Hex edge length in pixels
    pub hex_size: f64,
    /// Canvas size in pixels
    pub width: f64,
    pub height: f64,
    pub highlight_depth: usize,
    pub animation_steps: u32,
    pub tick_hz: u32,
    pub region_count: usize,
    pub tunnel_size: usize,
    pub tunnel_failure_ceiling: u32,
    /// Random seed for generators (None = entropy)
    pub seed: Option<u64>,
    pub debug_paths: bool,
    pub units: Vec<UnitSpawn>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 5,
            hex_size: DEFAULT_HEX_SIZE,
            width: 1000.0,
            height: 1100.0,
            highlight_depth: DEFAULT_HIGHLIGHT_DEPTH,
            animation_steps: DEFAULT_TOTAL_STEPS,
            tick_hz: 60,
            region_count: 4,
            tunnel_size: 8,
            tunnel_failure_ceiling: DEFAULT_FAILURE_CEILING,
            seed: None,
            debug_paths: false,
            units: vec![
                UnitSpawn::new("soldier_1.png", 0, 0),
                UnitSpawn::new("soldier_1.png", 1, 0),
                UnitSpawn::new("soldier_1.png", 2, 0),
                UnitSpawn::new("crab_2.png", 0, 4),
                UnitSpawn::new("crab_2.png", 1, 4),
                UnitSpawn::new("crab_2.png", 2, 4),
            ],
        }
    }
}

impl GameConfig {
    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check grid shape, generator parameters and unit positions.
    ///
    /// Every spawn cell must be distinct; a shared cell would displace a unit.
    pub fn validate(&self) -> Result<()> {
        let grid = HexGrid::new(self.rows, self.columns, self.hex_size)?;
        let cells = grid.len();

        if self.region_count == 0 || self.region_count > cells {
            return Err(GridError::InvalidRegionCount {
                requested: self.region_count,
                cells,
            });
        }
        self.tunnel_generator().validate(&grid)?;
        if self.tick_hz == 0 {
            return Err(GridError::InvalidGeometry("tick rate must be positive".to_string()));
        }
        let mut taken = FxHashSet::default();
        for unit in &self.units {
            grid.cell_at(unit.row, unit.col)?;
            if !taken.insert(Hex::new(unit.row, unit.col)) {
                return Err(GridError::DuplicateSpawn {
                    row: unit.row,
                    col: unit.col,
                });
            }
        }
        Ok(())
    }

    pub fn region_generator(&self) -> RegionGenerator {
        RegionGenerator::new(self.region_count)
    }

    pub fn tunnel_generator(&self) -> TunnelGenerator {
        TunnelGenerator::new(self.tunnel_size).with_failure_ceiling(self.tunnel_failure_ceiling)
    }

    /// Build the grid, place the unit roster and wrap it in a game state
    pub fn build_state(&self) -> Result<GameState> {
        self.validate()?;
        let grid = HexGrid::new(self.rows, self.columns, self.hex_size)?;
        let mut placement = EntityPlacement::new();

        for unit in &self.units {
            let hex = Hex::new(unit.row, unit.col);
            placement.place(Entity::unit(unit.asset.as_str(), unit.extent), hex);
        }

        Ok(GameState::new(grid, placement)
            .with_highlight_depth(self.highlight_depth)
            .with_animation_steps(self.animation_steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_layout() {
        let config = GameConfig::default();
        assert_eq!((config.rows, config.columns), (5, 5));
        assert_eq!(config.hex_size, 100.0);
        assert_eq!(config.animation_steps, 60);
        assert_eq!(config.tunnel_failure_ceiling, 1000);
        assert_eq!(config.units.len(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_build_state_places_units() {
        let state = GameConfig::default().build_state().unwrap();
        assert_eq!(state.placement().placed().len(), 6);
        assert!(state.placement().entity_at(Hex::new(2, 4)).is_some());
        assert!(state.placement().entity_at(Hex::new(4, 4)).is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"rows": 8, "units": []}"#).unwrap();
        assert_eq!(config.rows, 8);
        assert_eq!(config.columns, 5);
        assert!(config.units.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = GameConfig {
            region_count: 26,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GridError::InvalidRegionCount { .. })));

        let config = GameConfig {
            units: vec![UnitSpawn::new("soldier_1.png", 5, 0)],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GridError::OutOfBounds { .. })));

        let config = GameConfig {
            hex_size: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            tunnel_size: 20,
            tunnel_failure_ceiling: 3,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GridError::InvalidFailureCeiling { .. })));
    }

    #[test]
    fn test_validate_rejects_shared_spawn_cell() {
        let config = GameConfig {
            units: vec![
                UnitSpawn::new("soldier_1.png", 1, 0),
                UnitSpawn::new("crab_2.png", 2, 4),
                UnitSpawn::new("crab_2.png", 1, 0),
            ],
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(GridError::DuplicateSpawn { row: 1, col: 0 })
        );
        assert!(config.build_state().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("hextactics-config-{}.json", std::process::id()));
        let config = GameConfig {
            seed: Some(42),
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = GameConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
