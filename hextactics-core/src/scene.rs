//! Renderer-agnostic scene snapshots
//!
//! A `Scene` is an ordered list of draw directives: cell polygons first,
//! then resting sprites, then moving sprites, then optional debug lines.
//! The rendering layer paints them in order and knows nothing else about
//! the game.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::entity::{AssetHandle, EntityId, Extent};
use crate::game::GameState;
use crate::grid::{Hex, Point};
use crate::region::RegionId;

/// Outline stroke in pixels
const OUTLINE_WIDTH: f64 = 5.0;

/// Golden angle in degrees; spreads consecutive region hues apart
const GOLDEN_ANGLE: f64 = 137.507_764;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const PINK: Color = Color::rgb(255, 175, 175);
    pub const TUNNEL: Color = Color::rgb(139, 90, 43);
    pub const DEBUG: Color = Color::rgb(0, 160, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Stable fill color for a region
    pub fn for_region(region: RegionId) -> Self {
        let hue = (region.0 as f64 * GOLDEN_ANGLE) % 360.0;
        hsv_to_rgb(hue, 0.45, 0.95)
    }
}

fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Color {
    let chroma = value * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = value - chroma;
    let channel = |c: f64| ((c + m) * 255.0).round() as u8;
    Color::rgb(channel(r), channel(g), channel(b))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawDirective {
    Polygon {
        hex: Hex,
        vertices: Vec<Point>,
        fill: Option<Color>,
        outline: Color,
        outline_width: f64,
    },
    Sprite {
        entity: EntityId,
        asset: AssetHandle,
        position: Point,
        extent: Extent,
        moving: bool,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },
}

/// Extra layers to include in a snapshot
#[derive(Clone, Copy, Debug, Default)]
pub struct SceneOptions<'a> {
    /// Carved tunnel cells, outlined in `Color::TUNNEL`
    pub tunnel: Option<&'a FxHashSet<Hex>>,
    /// Draw each in-flight move as a line from origin to destination
    pub debug_paths: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub background: Color,
    pub directives: Vec<DrawDirective>,
}

impl Scene {
    /// Snapshot the current state for a `width x height` canvas
    pub fn capture(state: &GameState, width: f64, height: f64, options: SceneOptions<'_>) -> Self {
        let grid = state.grid();
        let mut directives = Vec::with_capacity(grid.len() + state.placement().len());

        for cell in grid.cells() {
            let fill = if state.selected() == Some(cell.hex) {
                Some(Color::RED)
            } else if state.highlighted().contains(&cell.hex) {
                Some(Color::PINK)
            } else {
                cell.region().map(Color::for_region)
            };

            let in_tunnel = options.tunnel.is_some_and(|t| t.contains(&cell.hex));
            directives.push(DrawDirective::Polygon {
                hex: cell.hex,
                vertices: cell.boundary().to_vec(),
                fill,
                outline: if in_tunnel { Color::TUNNEL } else { Color::BLACK },
                outline_width: OUTLINE_WIDTH,
            });
        }

        let moving: FxHashSet<EntityId> = state.animations().iter().map(|a| a.entity()).collect();
        for (id, hex) in state.placement().placed() {
            if moving.contains(&id) {
                continue;
            }
            let (Some(entity), Ok(cell)) = (state.placement().get(id), grid.cell(hex)) else {
                continue;
            };
            directives.push(DrawDirective::Sprite {
                entity: id,
                asset: entity.asset().clone(),
                position: entity.centered_position(cell),
                extent: entity.extent(),
                moving: false,
            });
        }

        for animation in state.animations() {
            let Some(entity) = state.placement().get(animation.entity()) else {
                continue;
            };
            directives.push(DrawDirective::Sprite {
                entity: animation.entity(),
                asset: animation.asset().clone(),
                position: animation.position(),
                extent: entity.extent(),
                moving: true,
            });
        }

        if options.debug_paths {
            for animation in state.animations() {
                if let (Ok(from), Ok(to)) = (
                    grid.center_of(animation.origin()),
                    grid.center_of(animation.destination()),
                ) {
                    directives.push(DrawDirective::Line {
                        from,
                        to,
                        color: Color::DEBUG,
                        width: 1.0,
                    });
                }
            }
        }

        Self {
            width,
            height,
            background: Color::WHITE,
            directives,
        }
    }

    pub fn sprites(&self) -> impl Iterator<Item = &DrawDirective> + '_ {
        self.directives
            .iter()
            .filter(|d| matches!(d, DrawDirective::Sprite { .. }))
    }

    /// Fill color of a cell's polygon, if the cell is drawn
    pub fn fill_of(&self, hex: Hex) -> Option<Color> {
        self.directives.iter().find_map(|d| match d {
            DrawDirective::Polygon { hex: h, fill, .. } if *h == hex => *fill,
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::grid::HexGrid;
    use crate::placement::EntityPlacement;
    use crate::region::RegionGenerator;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn game() -> GameState {
        let grid = HexGrid::new(5, 5, 100.0).unwrap();
        let mut placement = EntityPlacement::new();
        placement.place(Entity::unit("soldier_1.png", Extent::new(64.0, 64.0)), Hex::new(0, 0));
        placement.place(Entity::unit("crab_2.png", Extent::new(64.0, 64.0)), Hex::new(0, 4));
        GameState::new(grid, placement).with_animation_steps(4)
    }

    #[test]
    fn test_idle_scene() {
        let state = game();
        let scene = Scene::capture(&state, 1000.0, 1100.0, SceneOptions::default());

        assert_eq!(scene.background, Color::WHITE);
        assert_eq!(scene.directives.len(), 25 + 2);
        assert!(scene.fill_of(Hex::new(0, 0)).is_none());
        assert_eq!(scene.sprites().count(), 2);
    }

    #[test]
    fn test_selection_colors() {
        let mut state = game();
        state.process_click_at(Hex::new(0, 0));
        let scene = Scene::capture(&state, 1000.0, 1100.0, SceneOptions::default());

        assert_eq!(scene.fill_of(Hex::new(0, 0)), Some(Color::RED));
        assert_eq!(scene.fill_of(Hex::new(1, 0)), Some(Color::PINK));
        assert_eq!(scene.fill_of(Hex::new(0, 1)), Some(Color::PINK));
        assert_eq!(scene.fill_of(Hex::new(3, 3)), None);
    }

    #[test]
    fn test_moving_sprite_replaces_resting_sprite() {
        let mut state = game();
        state.process_click_at(Hex::new(0, 0));
        state.process_click_at(Hex::new(1, 0));
        state.update();

        let scene = Scene::capture(
            &state,
            1000.0,
            1100.0,
            SceneOptions {
                debug_paths: true,
                ..Default::default()
            },
        );
        let moving: Vec<_> = scene
            .sprites()
            .filter(|d| matches!(d, DrawDirective::Sprite { moving: true, .. }))
            .collect();
        assert_eq!(moving.len(), 1);
        assert_eq!(scene.sprites().count(), 2);
        assert!(matches!(scene.directives.last(), Some(DrawDirective::Line { .. })));
    }

    #[test]
    fn test_region_and_tunnel_layers() {
        let mut state = game();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        RegionGenerator::new(3).generate(state.grid_mut(), &mut rng).unwrap();
        let tunnel: FxHashSet<Hex> = [Hex::new(4, 4)].into_iter().collect();

        let scene = Scene::capture(
            &state,
            1000.0,
            1100.0,
            SceneOptions {
                tunnel: Some(&tunnel),
                debug_paths: false,
            },
        );

        let region = state.grid().region_of(Hex::new(2, 2)).unwrap().unwrap();
        assert_eq!(scene.fill_of(Hex::new(2, 2)), Some(Color::for_region(region)));
        let outlined = scene.directives.iter().any(|d| {
            matches!(d, DrawDirective::Polygon { hex, outline, .. } if *hex == Hex::new(4, 4) && *outline == Color::TUNNEL)
        });
        assert!(outlined);
    }

    #[test]
    fn test_region_colors_differ() {
        let colors: FxHashSet<Color> = (0..8).map(|i| Color::for_region(RegionId(i))).collect();
        assert_eq!(colors.len(), 8);
    }

    #[test]
    fn test_scene_serializes() {
        let state = game();
        let scene = Scene::capture(&state, 1000.0, 1100.0, SceneOptions::default());
        let json = serde_json::to_value(&scene).unwrap();
        assert_eq!(json["directives"][0]["type"], "polygon");
        assert_eq!(json["directives"][25]["type"], "sprite");
    }
}
