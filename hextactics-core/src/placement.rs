//! Entity placement ledger
//!
//! A partial bijection between entities and cells, indexed both ways so
//! `cell_of` and `entity_at` are both constant time. Every mutation updates
//! the forward and reverse maps together.

use rustc_hash::FxHashMap;

use crate::entity::{Entity, EntityId};
use crate::error::{GridError, Result};
use crate::grid::Hex;

#[derive(Clone, Debug, Default)]
pub struct EntityPlacement {
    entities: FxHashMap<EntityId, Entity>,
    /// entity -> cell
    cells: FxHashMap<EntityId, Hex>,
    /// cell -> entity
    occupants: FxHashMap<Hex, EntityId>,
    next_id: u32,
}

impl EntityPlacement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity without a cell
    pub fn add_loose(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, entity);
        id
    }

    /// Register an entity and place it in one step
    pub fn place(&mut self, entity: Entity, hex: Hex) -> EntityId {
        let id = self.add_loose(entity);
        self.put(id, hex);
        id
    }

    /// Move a registered entity to `hex`, dropping its previous cell.
    ///
    /// Last write wins: an entity already in `hex` is evicted to the loose
    /// set so the ledger stays a bijection.
    pub fn assign(&mut self, id: EntityId, hex: Hex) -> Result<()> {
        if !self.entities.contains_key(&id) {
            return Err(GridError::UnknownEntity(id));
        }
        self.put(id, hex);
        Ok(())
    }

    fn put(&mut self, id: EntityId, hex: Hex) {
        if let Some(previous) = self.cells.remove(&id) {
            self.occupants.remove(&previous);
        }

        if let Some(evicted) = self.occupants.insert(hex, id) {
            if evicted != id {
                self.cells.remove(&evicted);
                tracing::warn!(%evicted, by = %id, ?hex, "cell already occupied, previous occupant is now loose");
            }
        }
        self.cells.insert(id, hex);
    }

    pub fn cell_of(&self, id: EntityId) -> Option<Hex> {
        self.cells.get(&id).copied()
    }

    pub fn entity_at(&self, hex: Hex) -> Option<EntityId> {
        self.occupants.get(&hex).copied()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.occupants.contains_key(&hex)
    }

    /// Loose and placed entities, sorted by id
    pub fn all_entities(&self) -> Vec<(EntityId, &Entity)> {
        let mut all: Vec<_> = self.entities.iter().map(|(&id, e)| (id, e)).collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    /// Placed entities with their cells, sorted by id
    pub fn placed(&self) -> Vec<(EntityId, Hex)> {
        let mut placed: Vec<_> = self.cells.iter().map(|(&id, &hex)| (id, hex)).collect();
        placed.sort_by_key(|(id, _)| *id);
        placed
    }

    /// Entities without a cell, sorted by id
    pub fn loose(&self) -> Vec<EntityId> {
        let mut loose: Vec<_> = self
            .entities
            .keys()
            .filter(|id| !self.cells.contains_key(id))
            .copied()
            .collect();
        loose.sort();
        loose
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Extent;

    fn soldier() -> Entity {
        Entity::unit("soldier_1.png", Extent::new(64.0, 64.0))
    }

    #[test]
    fn test_reassign_clears_old_cell() {
        let mut ledger = EntityPlacement::new();
        let id = ledger.place(soldier(), Hex::new(0, 0));
        ledger.assign(id, Hex::new(1, 1)).unwrap();

        assert_eq!(ledger.cell_of(id), Some(Hex::new(1, 1)));
        assert_eq!(ledger.entity_at(Hex::new(1, 1)), Some(id));
        assert_eq!(ledger.entity_at(Hex::new(0, 0)), None);
    }

    #[test]
    fn test_assign_to_same_cell_is_stable() {
        let mut ledger = EntityPlacement::new();
        let id = ledger.place(soldier(), Hex::new(2, 2));
        ledger.assign(id, Hex::new(2, 2)).unwrap();
        assert_eq!(ledger.cell_of(id), Some(Hex::new(2, 2)));
        assert_eq!(ledger.entity_at(Hex::new(2, 2)), Some(id));
    }

    #[test]
    fn test_last_write_wins_evicts_occupant() {
        let mut ledger = EntityPlacement::new();
        let a = ledger.place(soldier(), Hex::new(0, 0));
        let b = ledger.place(soldier(), Hex::new(0, 1));
        ledger.assign(b, Hex::new(0, 0)).unwrap();

        assert_eq!(ledger.entity_at(Hex::new(0, 0)), Some(b));
        assert_eq!(ledger.cell_of(a), None);
        assert_eq!(ledger.entity_at(Hex::new(0, 1)), None);
        assert_eq!(ledger.loose(), vec![a]);
    }

    #[test]
    fn test_loose_entities() {
        let mut ledger = EntityPlacement::new();
        let loose = ledger.add_loose(soldier());
        let placed = ledger.place(soldier(), Hex::new(3, 3));

        assert_eq!(ledger.cell_of(loose), None);
        assert_eq!(ledger.loose(), vec![loose]);
        assert_eq!(ledger.placed(), vec![(placed, Hex::new(3, 3))]);
        assert_eq!(ledger.all_entities().len(), 2);

        ledger.assign(loose, Hex::new(0, 0)).unwrap();
        assert!(ledger.loose().is_empty());
    }

    #[test]
    fn test_assign_unknown_entity() {
        let mut ledger = EntityPlacement::new();
        assert_eq!(
            ledger.assign(EntityId(42), Hex::new(0, 0)),
            Err(GridError::UnknownEntity(EntityId(42)))
        );
        assert!(!ledger.is_occupied(Hex::new(0, 0)));
    }
}
