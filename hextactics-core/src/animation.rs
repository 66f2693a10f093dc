//! Time-stepped move animation between two cells

use std::fmt;

use crate::entity::{AssetHandle, Entity, EntityId};
use crate::error::Result;
use crate::grid::{Hex, HexGrid, Point};
use crate::placement::EntityPlacement;

/// Steps a move takes at the default 60 Hz tick (one second)
pub const DEFAULT_TOTAL_STEPS: u32 = 60;

/// Fired once when the animation reaches its destination
pub type OnComplete = Box<dyn FnOnce(&mut EntityPlacement) + Send>;

/// One in-flight relocation, interpolated linearly over `total_steps` ticks
pub struct MoveAnimation {
    entity: EntityId,
    asset: AssetHandle,
    origin: Hex,
    destination: Hex,
    destination_pixel: Point,
    current: Point,
    delta: Point,
    elapsed_steps: u32,
    total_steps: u32,
    on_complete: Option<OnComplete>,
}

impl MoveAnimation {
    pub fn new(
        grid: &HexGrid,
        id: EntityId,
        entity: &Entity,
        origin: Hex,
        destination: Hex,
        total_steps: u32,
        on_complete: OnComplete,
    ) -> Result<Self> {
        let total_steps = total_steps.max(1);
        let origin_pixel = entity.centered_position(grid.cell(origin)?);
        let destination_pixel = entity.centered_position(grid.cell(destination)?);

        Ok(Self {
            entity: id,
            asset: entity.asset().clone(),
            origin,
            destination,
            destination_pixel,
            current: origin_pixel,
            delta: (destination_pixel - origin_pixel) / total_steps as f64,
            elapsed_steps: 0,
            total_steps,
            on_complete: Some(on_complete),
        })
    }

    /// Advance one step; returns true once the move has finished.
    ///
    /// The final step lands exactly on the destination and fires the
    /// completion callback. Calls after that change nothing.
    pub fn update(&mut self, placement: &mut EntityPlacement) -> bool {
        if self.is_complete() {
            return true;
        }

        self.elapsed_steps += 1;
        if self.elapsed_steps < self.total_steps {
            self.current = self.current + self.delta;
            return false;
        }

        self.current = self.destination_pixel;
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(placement);
        }
        true
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed_steps >= self.total_steps
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn asset(&self) -> &AssetHandle {
        &self.asset
    }

    pub fn origin(&self) -> Hex {
        self.origin
    }

    pub fn destination(&self) -> Hex {
        self.destination
    }

    /// Current interpolated sprite position
    pub fn position(&self) -> Point {
        self.current
    }

    pub fn elapsed_steps(&self) -> u32 {
        self.elapsed_steps
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }
}

impl fmt::Debug for MoveAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveAnimation")
            .field("entity", &self.entity)
            .field("origin", &self.origin)
            .field("destination", &self.destination)
            .field("current", &self.current)
            .field("elapsed_steps", &self.elapsed_steps)
            .field("total_steps", &self.total_steps)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Extent;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn setup() -> (HexGrid, EntityPlacement, EntityId) {
        let grid = HexGrid::new(5, 5, 100.0).unwrap();
        let mut placement = EntityPlacement::new();
        let id = placement.place(
            Entity::unit("soldier_1.png", Extent::new(64.0, 64.0)),
            Hex::new(0, 0),
        );
        (grid, placement, id)
    }

    #[test]
    fn test_completes_after_total_steps() {
        let (grid, mut placement, id) = setup();
        let entity = placement.get(id).unwrap().clone();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);

        let mut animation = MoveAnimation::new(
            &grid,
            id,
            &entity,
            Hex::new(0, 0),
            Hex::new(1, 0),
            DEFAULT_TOTAL_STEPS,
            Box::new(move |_: &mut EntityPlacement| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

        for step in 1..DEFAULT_TOTAL_STEPS {
            assert!(!animation.update(&mut placement), "finished early at {}", step);
        }
        assert!(animation.update(&mut placement));
        assert!(animation.is_complete());
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        let expected = entity.centered_position(grid.cell_at(1, 0).unwrap());
        assert!(animation.position().distance_to(expected) < 1e-6);

        // Further updates are no-ops
        assert!(animation.update(&mut placement));
        assert_eq!(animation.elapsed_steps(), DEFAULT_TOTAL_STEPS);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_interpolates_linearly() {
        let (grid, mut placement, id) = setup();
        let entity = placement.get(id).unwrap().clone();
        let mut animation = MoveAnimation::new(
            &grid,
            id,
            &entity,
            Hex::new(0, 0),
            Hex::new(0, 1),
            4,
            Box::new(|_: &mut EntityPlacement| {}),
        )
        .unwrap();

        let start = animation.position();
        let end = entity.centered_position(grid.cell_at(0, 1).unwrap());
        animation.update(&mut placement);
        animation.update(&mut placement);

        let halfway = start + (end - start) / 2.0;
        assert!(animation.position().distance_to(halfway) < 1e-9);
    }

    #[test]
    fn test_callback_moves_entity() {
        let (grid, mut placement, id) = setup();
        let entity = placement.get(id).unwrap().clone();
        let target = Hex::new(1, 0);
        let mut animation = MoveAnimation::new(
            &grid,
            id,
            &entity,
            Hex::new(0, 0),
            target,
            2,
            Box::new(move |ledger: &mut EntityPlacement| {
                ledger.assign(id, target).unwrap();
            }),
        )
        .unwrap();

        animation.update(&mut placement);
        assert_eq!(placement.cell_of(id), Some(Hex::new(0, 0)));
        animation.update(&mut placement);
        assert_eq!(placement.cell_of(id), Some(target));
    }

    #[test]
    fn test_zero_steps_clamped() {
        let (grid, mut placement, id) = setup();
        let entity = placement.get(id).unwrap().clone();
        let mut animation = MoveAnimation::new(
            &grid,
            id,
            &entity,
            Hex::new(0, 0),
            Hex::new(1, 0),
            0,
            Box::new(|_: &mut EntityPlacement| {}),
        )
        .unwrap();
        assert_eq!(animation.total_steps(), 1);
        assert!(animation.update(&mut placement));
    }

    #[test]
    fn test_out_of_bounds_destination() {
        let (grid, placement, id) = setup();
        let entity = placement.get(id).unwrap().clone();
        let result = MoveAnimation::new(
            &grid,
            id,
            &entity,
            Hex::new(0, 0),
            Hex::new(9, 9),
            DEFAULT_TOTAL_STEPS,
            Box::new(|_: &mut EntityPlacement| {}),
        );
        assert!(result.is_err());
    }
}
