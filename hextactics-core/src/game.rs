//! Click-driven selection state machine
//!
//! | selection | click target                  | result                          |
//! |-----------|-------------------------------|---------------------------------|
//! | none      | occupied cell                 | select, highlight neighbours    |
//! | none      | empty cell / nothing          | no-op                           |
//! | some S    | S                             | deselect                        |
//! | some S    | highlighted, occupied         | no-op (interaction pending)     |
//! | some S    | highlighted, empty            | schedule move, deselect         |
//! | some S    | anything else                 | deselect                        |

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::animation::{MoveAnimation, DEFAULT_TOTAL_STEPS};
use crate::entity::EntityId;
use crate::error::GridError;
use crate::grid::{Hex, HexGrid, Point};
use crate::input::InputEvent;
use crate::placement::EntityPlacement;

/// Hops from the selected cell that count as a legal move
pub const DEFAULT_HIGHLIGHT_DEPTH: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Waiting for the player
    PlayerMove,
    /// At least one move is still animating
    BlockingAnimation,
}

/// What a single click did to the state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClickOutcome {
    Selected(Hex),
    Deselected,
    MoveScheduled { entity: EntityId, from: Hex, to: Hex },
    /// Nothing changed
    Ignored,
}

// ============================================================================
// GAME STATE
// ============================================================================

#[derive(Debug)]
pub struct GameState {
    grid: HexGrid,
    placement: EntityPlacement,
    selected: Option<Hex>,
    /// Always the depth-limited closure of `selected`
    highlighted: FxHashSet<Hex>,
    animations: Vec<MoveAnimation>,
    highlight_depth: usize,
    animation_steps: u32,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn new(grid: HexGrid, placement: EntityPlacement) -> Self {
        Self {
            grid,
            placement,
            selected: None,
            highlighted: FxHashSet::default(),
            animations: Vec::new(),
            highlight_depth: DEFAULT_HIGHLIGHT_DEPTH,
            animation_steps: DEFAULT_TOTAL_STEPS,
        }
    }

    pub fn with_highlight_depth(mut self, depth: usize) -> Self {
        self.highlight_depth = depth;
        self
    }

    pub fn with_animation_steps(mut self, steps: u32) -> Self {
        self.animation_steps = steps.max(1);
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    /// Mutable grid access for generators and resizing
    pub fn grid_mut(&mut self) -> &mut HexGrid {
        &mut self.grid
    }

    pub fn placement(&self) -> &EntityPlacement {
        &self.placement
    }

    pub fn placement_mut(&mut self) -> &mut EntityPlacement {
        &mut self.placement
    }

    pub fn selected(&self) -> Option<Hex> {
        self.selected
    }

    pub fn highlighted(&self) -> &FxHashSet<Hex> {
        &self.highlighted
    }

    pub fn animations(&self) -> &[MoveAnimation] {
        &self.animations
    }

    pub fn highlight_depth(&self) -> usize {
        self.highlight_depth
    }

    pub fn phase(&self) -> GamePhase {
        if self.animations.is_empty() {
            GamePhase::PlayerMove
        } else {
            GamePhase::BlockingAnimation
        }
    }

    /// Check if an entity is part of an unfinished move
    pub fn is_animating(&self, entity: EntityId) -> bool {
        self.animations
            .iter()
            .any(|a| a.entity() == entity && !a.is_complete())
    }

    /// Occupied now, or the destination of an unfinished move
    fn is_reserved(&self, hex: Hex) -> bool {
        self.placement.is_occupied(hex)
            || self
                .animations
                .iter()
                .any(|a| a.destination() == hex && !a.is_complete())
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    /// Feed one drained input event; only primary presses act
    pub fn process_event(&mut self, event: InputEvent) -> ClickOutcome {
        if !event.is_click() {
            return ClickOutcome::Ignored;
        }
        self.process_click(event.point)
    }

    /// Click at a canvas pixel. A miss resolves to "no cell".
    pub fn process_click(&mut self, point: Point) -> ClickOutcome {
        let target = self.grid.hit_test(point);
        self.transition(target)
    }

    /// Click on a cell by coordinate. Unresolvable coordinates are a no-op.
    pub fn process_click_at(&mut self, hex: Hex) -> ClickOutcome {
        if !self.grid.contains(hex) {
            let err = GridError::UnreachableSelection(hex);
            tracing::warn!(%err, "ignoring click");
            return ClickOutcome::Ignored;
        }
        self.transition(Some(hex))
    }

    fn transition(&mut self, target: Option<Hex>) -> ClickOutcome {
        let outcome = match (self.selected, target) {
            (None, None) => ClickOutcome::Ignored,
            (None, Some(hex)) => self.try_select(hex),
            (Some(_), None) => self.deselect(),
            (Some(selected), Some(hex)) if hex == selected => self.deselect(),
            (Some(selected), Some(hex)) if self.highlighted.contains(&hex) => {
                if self.is_reserved(hex) {
                    // Interaction with an occupied target is not defined yet
                    ClickOutcome::Ignored
                } else {
                    self.schedule_move(selected, hex)
                }
            }
            (Some(_), Some(_)) => self.deselect(),
        };

        tracing::debug!(?target, ?outcome, "processed click");
        outcome
    }

    fn try_select(&mut self, hex: Hex) -> ClickOutcome {
        match self.placement.entity_at(hex) {
            Some(entity) if self.is_animating(entity) => ClickOutcome::Ignored,
            Some(_) => {
                self.selected = Some(hex);
                self.highlighted = self.grid.neighbors_within_depth(hex, self.highlight_depth);
                ClickOutcome::Selected(hex)
            }
            None => ClickOutcome::Ignored,
        }
    }

    fn deselect(&mut self) -> ClickOutcome {
        self.selected = None;
        self.highlighted.clear();
        ClickOutcome::Deselected
    }

    fn schedule_move(&mut self, from: Hex, to: Hex) -> ClickOutcome {
        let Some(id) = self.placement.entity_at(from) else {
            tracing::warn!(?from, "selected cell lost its entity");
            return self.deselect();
        };
        let Some(entity) = self.placement.get(id) else {
            return self.deselect();
        };

        let on_complete = Box::new(move |placement: &mut EntityPlacement| {
            if let Err(err) = placement.assign(id, to) {
                tracing::warn!(%err, "move completed for unknown entity");
            }
        });

        match MoveAnimation::new(&self.grid, id, entity, from, to, self.animation_steps, on_complete) {
            Ok(animation) => {
                self.animations.push(animation);
                self.deselect();
                ClickOutcome::MoveScheduled { entity: id, from, to }
            }
            Err(err) => {
                tracing::warn!(%err, "could not schedule move");
                self.deselect()
            }
        }
    }

    // ========================================================================
    // TICK
    // ========================================================================

    /// Advance every animation one step and drop the finished ones.
    ///
    /// Returns the number of moves that completed on this tick.
    pub fn update(&mut self) -> usize {
        let placement = &mut self.placement;
        for animation in &mut self.animations {
            animation.update(placement);
        }

        let before = self.animations.len();
        self.animations.retain(|a| !a.is_complete());
        let completed = before - self.animations.len();
        if completed > 0 {
            tracing::debug!(completed, in_flight = self.animations.len(), "moves completed");
        }
        completed
    }
}

// ============================================================================
// TESTS
// ============================================================================
