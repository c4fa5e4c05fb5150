//! Arena module: the single owner of every live entity.
//!
//! The Arena provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - Entity lifecycle management (spawn/despawn)
//! - Handle validation: everything outside the arena refers to entities by
//!   [`EntityId`], and a lookup of a despawned id returns `None`
//!
//! # Architecture
//!
//! Entity IDs are monotonically increasing and never reused, not even across
//! [`Arena::clear`]. A handle kept by a grid cell, a contact record or the
//! orchestrator's player alias therefore can never alias a newer entity.
//!
//! # Example
//!
//! ```
//! use dodgeout_core::arena::Arena;
//! use dodgeout_core::entity::{EntityInner, HazardSpawn};
//!
//! let mut arena = Arena::new();
//! let (body, hazard) = HazardSpawn::default().into_parts();
//! let id = arena.spawn(body, EntityInner::Hazard(hazard));
//!
//! assert!(arena.get(id).is_some());
//! arena.despawn(id);
//! assert!(arena.get(id).is_none());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{Body, Entity, EntityId, EntityInner, FrameInfo};

// =============================================================================
// Arena
// =============================================================================

/// Container for all live entities.
///
/// # Determinism
///
/// The Arena uses `BTreeMap` for entity storage so iteration always follows
/// ascending id order, which is also spawn order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
}

impl Arena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entities: BTreeMap::new(),
        }
    }

    /// Spawns a new entity and returns its id.
    pub fn spawn(&mut self, body: Body, inner: EntityInner) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;

        let entity = Entity::new(id, body, inner);
        debug!(
            %id,
            tag = %entity.tag(),
            x = entity.body().position.x,
            y = entity.body().position.y,
            "spawned entity"
        );
        self.entities.insert(id, entity);
        id
    }

    /// Removes an entity, returning it if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.entities.remove(&id);
        if let Some(entity) = &removed {
            debug!(%id, tag = %entity.tag(), "despawned entity");
        }
        removed
    }

    /// Removes every entity. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns true if `id` refers to a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Snapshot of an entity for the current collision pass.
    #[must_use]
    pub fn frame_info(&self, id: EntityId) -> Option<FrameInfo> {
        self.get(id).map(Entity::frame_info)
    }

    /// Returns an iterator over entity IDs in deterministic (sorted) order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Returns an iterator over entities in deterministic (sorted by ID) order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Returns an iterator over mutable entities in deterministic order.
    pub fn entities_sorted_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.values_mut()
    }

    /// Ids of every tombstoned entity, in id order.
    #[must_use]
    pub fn deletable_ids(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.body().is_deletable())
            .map(Entity::id)
            .collect()
    }

    /// Returns the number of entities in the arena.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{HazardSpawn, PlayerComponents};
    use crate::geometry::Position;

    fn spawn_hazard(arena: &mut Arena, x: f64, y: f64) -> EntityId {
        let (body, hazard) = HazardSpawn::at(Position::new(x, y)).into_parts();
        arena.spawn(body, EntityInner::Hazard(hazard))
    }

    fn spawn_player(arena: &mut Arena) -> EntityId {
        arena.spawn(
            PlayerComponents::starting_body(),
            EntityInner::Player(PlayerComponents::new(4)),
        )
    }

    mod arena_tests {
        use super::*;

        #[test]
        fn new_creates_empty_arena() {
            let arena = Arena::new();
            assert!(arena.is_empty());
            assert_eq!(arena.entity_count(), 0);
        }

        #[test]
        fn default_creates_empty_arena() {
            let arena = Arena::default();
            assert!(arena.is_empty());
        }

        #[test]
        fn spawn_creates_entity_with_sequential_ids() {
            let mut arena = Arena::new();
            let p = spawn_player(&mut arena);
            let h = spawn_hazard(&mut arena, 10.0, 10.0);
            assert_eq!(p.as_u64(), 0);
            assert_eq!(h.as_u64(), 1);
            assert!(arena.get(p).unwrap().is_player());
            assert!(arena.get(h).unwrap().is_hazard());
        }

        #[test]
        fn despawn_removes_entity() {
            let mut arena = Arena::new();
            let id = spawn_hazard(&mut arena, 10.0, 10.0);
            let removed = arena.despawn(id);
            assert_eq!(removed.map(|e| e.id()), Some(id));
            assert!(!arena.contains(id));
            assert!(arena.despawn(id).is_none());
        }

        #[test]
        fn ids_are_never_reused() {
            let mut arena = Arena::new();
            let first = spawn_hazard(&mut arena, 10.0, 10.0);
            arena.despawn(first);
            arena.clear();
            let second = spawn_hazard(&mut arena, 10.0, 10.0);
            assert_ne!(first, second);
            assert!(arena.get(first).is_none());
        }

        #[test]
        fn get_mut_returns_mutable_entity() {
            let mut arena = Arena::new();
            let id = spawn_hazard(&mut arena, 10.0, 10.0);
            arena.get_mut(id).unwrap().body_mut().mark_deletable();
            assert_eq!(arena.deletable_ids(), vec![id]);
        }

        #[test]
        fn entity_ids_sorted_after_despawn() {
            let mut arena = Arena::new();
            let ids: Vec<_> = (0..5)
                .map(|i| spawn_hazard(&mut arena, f64::from(i) * 10.0, 10.0))
                .collect();
            arena.despawn(ids[2]);
            let remaining: Vec<_> = arena.entity_ids_sorted().collect();
            assert_eq!(remaining, vec![ids[0], ids[1], ids[3], ids[4]]);
        }

        #[test]
        fn frame_info_snapshots_live_entities() {
            let mut arena = Arena::new();
            let id = spawn_hazard(&mut arena, 30.0, 20.0);
            let info = arena.frame_info(id).unwrap();
            assert_eq!(info.entity, id);
            assert_eq!(info.mass, 9);
            assert!(arena.frame_info(EntityId::new(99)).is_none());
        }

        #[test]
        fn serialization_roundtrip() {
            let mut arena = Arena::new();
            spawn_player(&mut arena);
            spawn_hazard(&mut arena, 20.0, 5.0);

            let json = serde_json::to_string(&arena).unwrap();
            let restored: Arena = serde_json::from_str(&json).unwrap();
            assert_eq!(restored.entity_count(), 2);
            let original: Vec<_> = arena.entities_sorted().cloned().collect();
            let roundtrip: Vec<_> = restored.entities_sorted().cloned().collect();
            assert_eq!(original, roundtrip);
        }
    }
}
