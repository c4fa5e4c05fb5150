//! Collision resolver: broad phase, narrow phase and response.
//!
//! Every substep the `CollisionResolver` rebuilds a [`UniformGrid`] from
//! scratch, inserting each entity into every cell one of its hitbox corners
//! falls in. Cells are then processed one at a time in row-major order.
//!
//! # Per-cell pass
//!
//! 1. Prune stale contacts of every member
//! 2. Snapshot every collidable member ([`FrameInfo`])
//! 3. For each intersecting unordered pair that is still eligible, run both
//!    entities' collision response against the other's snapshot
//! 4. Prune again
//!
//! A pair is eligible only if neither entity is tombstoned or non-collidable
//! and neither already records the other as a contact. That contact record is
//! what keeps a pair from receiving an impulse every substep while it stays
//! in contact, and what makes testing the same pair in two cells harmless.
//!
//! # Parallelism
//!
//! Finding which member pairs overlap is pure geometry on hitboxes that no
//! longer move this substep, so it runs per cell with rayon. Responses are
//! applied sequentially afterwards, in cell order and then pair order.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tessera::{OccupancyStats, UniformGrid};
use tracing::trace;

use crate::arena::Arena;
use crate::consts::{COLLISION_CELL_SIZE, GRID_HEIGHT, GRID_WIDTH};
use crate::entity::{Body, EntityId, FrameInfo, Strike};
use crate::timer::Micros;

use super::Resolver;

/// Resolver for broad-phase bucketing and collision response.
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    grid: UniformGrid<EntityId>,
}

impl CollisionResolver {
    /// Creates a resolver with an empty arena-sized grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: UniformGrid::new(GRID_WIDTH, GRID_HEIGHT, COLLISION_CELL_SIZE),
        }
    }

    /// The grid as of the last pass.
    #[must_use]
    pub const fn grid(&self) -> &UniformGrid<EntityId> {
        &self.grid
    }

    /// Occupancy summary of the last pass.
    #[must_use]
    pub fn occupancy_stats(&self) -> OccupancyStats {
        OccupancyStats::from_grid(&self.grid)
    }

    /// Empties the grid.
    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Clears the grid and inserts every entity at its hitbox corners.
    pub fn rebuild(&mut self, arena: &Arena) {
        self.grid.clear();
        for entity in arena.entities_sorted() {
            self.grid
                .insert_points(entity.id(), entity.body().rect().corners());
        }
    }

    /// Intersecting member pairs of every cell, in row-major cell order.
    fn overlapping_pairs(&self, arena: &Arena) -> Vec<Vec<(EntityId, EntityId)>> {
        self.grid
            .cells_slice()
            .par_iter()
            .map(|cell| {
                cell.pairs()
                    .filter(|&(a, b)| match (arena.get(a), arena.get(b)) {
                        (Some(ea), Some(eb)) => ea.intersects(eb),
                        _ => false,
                    })
                    .collect()
            })
            .collect()
    }

    /// Drops contacts that no longer hold.
    ///
    /// A non-collidable entity forgets everything. Otherwise a contact is
    /// dropped when the peer is gone, tombstoned, non-collidable, or no
    /// longer intersecting.
    pub fn prune_contacts(arena: &mut Arena, id: EntityId) {
        let Some(entity) = arena.get(id) else {
            return;
        };

        if !entity.body().is_collidable() {
            if !entity.body().contacts().is_empty() {
                if let Some(entity) = arena.get_mut(id) {
                    entity.body_mut().clear_contacts();
                }
            }
            return;
        }

        let stale: Vec<EntityId> = entity
            .body()
            .contacts()
            .iter()
            .map(|contact| contact.entity)
            .filter(|&peer| match arena.get(peer) {
                None => true,
                Some(other) => {
                    other.body().is_deletable()
                        || !other.body().is_collidable()
                        || !entity.intersects(other)
                }
            })
            .collect();

        if stale.is_empty() {
            return;
        }
        if let Some(entity) = arena.get_mut(id) {
            entity.body_mut().forget_contacts(&stale);
        }
    }

    /// Whether `a` and `b` may still respond to each other this pass.
    fn is_eligible(arena: &Arena, a: EntityId, b: EntityId) -> bool {
        let (Some(ea), Some(eb)) = (arena.get(a), arena.get(b)) else {
            return false;
        };
        let live = |body: &Body| body.is_collidable() && !body.is_deletable();
        live(ea.body())
            && live(eb.body())
            && !ea.body().is_colliding_with(b)
            && !eb.body().is_colliding_with(a)
    }

    /// Runs both sides of a first contact, delivering any strike immediately.
    fn respond(arena: &mut Arena, a: &FrameInfo, b: &FrameInfo) {
        for (own, other) in [(a, b), (b, a)] {
            let strike = arena
                .get_mut(own.entity)
                .and_then(|entity| entity.handle_collision(own, other));
            if let Some(strike) = strike {
                Self::deliver(arena, strike);
            }
        }
    }

    fn deliver(arena: &mut Arena, strike: Strike) {
        if let Some(target) = arena.get_mut(strike.target) {
            target.take_damage(strike.damage, strike.attacker);
        }
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for CollisionResolver {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn resolve(&mut self, arena: &mut Arena, _dt: Micros) {
        self.rebuild(arena);
        let overlaps = self.overlapping_pairs(arena);

        for (cell, pairs) in self.grid.cells().zip(overlaps) {
            if cell.is_empty() {
                continue;
            }
            let members: Vec<EntityId> = cell.members().collect();
            for &id in &members {
                Self::prune_contacts(arena, id);
            }
            if members.len() < 2 {
                continue;
            }

            let snapshots: BTreeMap<EntityId, FrameInfo> = members
                .iter()
                .filter_map(|&id| arena.get(id))
                .filter(|entity| entity.body().is_collidable())
                .map(|entity| (entity.id(), entity.frame_info()))
                .collect();

            for (a, b) in pairs {
                let (Some(sa), Some(sb)) = (snapshots.get(&a), snapshots.get(&b)) else {
                    continue;
                };
                if Self::is_eligible(arena, a, b) {
                    Self::respond(arena, sa, sb);
                }
            }

            for &id in &members {
                Self::prune_contacts(arena, id);
            }
        }

        let stats = self.occupancy_stats();
        trace!(
            occupied = stats.occupied_cells,
            memberships = stats.total_memberships,
            busiest = stats.max_members,
            "collision pass"
        );
    }
}
