//! HEXTACTICS Core - Grid engine and interaction state machine
//!
//! This crate provides the core of the hex tactics prototype:
//! - Hex grid geometry (offset columns), adjacency and hit testing
//! - Region partitioning and tunnel carving
//! - Entity placement ledger
//! - Move animations and the click-driven game state
//! - Renderer-agnostic scene snapshots

pub mod animation;
pub mod config;
pub mod entity;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod placement;
pub mod region;
pub mod scene;
pub mod tunnel;

// Re-exports for convenient access
pub use animation::{MoveAnimation, OnComplete, DEFAULT_TOTAL_STEPS};
pub use config::{GameConfig, UnitSpawn};
pub use entity::{AssetHandle, Entity, EntityId, Extent, Unit};
pub use error::GridError;
pub use game::{ClickOutcome, GamePhase, GameState, DEFAULT_HIGHLIGHT_DEPTH};
pub use grid::{Cell, Hex, HexGrid, Point};
pub use input::{EventQueue, InputEvent, InputKind};
pub use placement::EntityPlacement;
pub use region::{RegionGenerator, RegionId, RegionMap};
pub use scene::{Color, DrawDirective, Scene, SceneOptions};
pub use tunnel::{TunnelGenerator, DEFAULT_FAILURE_CEILING};
