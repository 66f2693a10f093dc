//! Abstract input events and the per-tick event queue
//!
//! The capture layer translates raw window events into `InputEvent`s and
//! pushes them onto an `EventQueue` owned by the composition root, which
//! drains it once per tick.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::grid::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    PrimaryDown,
    PrimaryUp,
    SecondaryDown,
    SecondaryUp,
    Move,
    Drag,
}

/// One pointer event in canvas coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub kind: InputKind,
    pub point: Point,
    /// Milliseconds since the UNIX epoch
    #[serde(default = "now_millis")]
    pub timestamp: u64,
}

impl InputEvent {
    pub fn new(kind: InputKind, point: Point) -> Self {
        Self {
            kind,
            point,
            timestamp: now_millis(),
        }
    }

    pub fn primary_down(point: Point) -> Self {
        Self::new(InputKind::PrimaryDown, point)
    }

    /// Only primary presses count as clicks
    pub fn is_click(&self) -> bool {
        self.kind == InputKind::PrimaryDown
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// FIFO of events waiting for the next tick
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Take every pending event in arrival order
    pub fn drain(&mut self) -> Vec<InputEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
