//! Physics resolver: contact pushback and per-entity integration.
//!
//! Each substep the `PhysicsResolver`:
//! 1. Computes, from the start-of-substep state, a soft depenetration nudge
//!    for every collidable entity away from each peer it is still touching
//! 2. Applies the nudges to physics velocity
//! 3. Runs every entity's own `update` in id order

use glam::DVec2;

use crate::arena::Arena;
use crate::entity::{Entity, EntityId};
use crate::timer::Micros;

use super::Resolver;

/// Resolver for kinematic integration.
///
/// # Example
///
/// ```
/// use dodgeout_core::arena::Arena;
/// use dodgeout_core::entity::{EntityInner, HazardSpawn};
/// use dodgeout_core::resolver::{PhysicsResolver, Resolver};
/// use glam::DVec2;
///
/// let mut arena = Arena::new();
/// let (body, hazard) = HazardSpawn { velocity: DVec2::new(0.0, 4.0), ..HazardSpawn::default() }
///     .into_parts();
/// let id = arena.spawn(body, EntityInner::Hazard(hazard));
///
/// PhysicsResolver::new().resolve(&mut arena, 500_000);
/// assert!((arena.get(id).unwrap().body().position.y - 2.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicsResolver;

impl PhysicsResolver {
    /// Creates a new physics resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Velocity nudge pushing `entity` away from every recorded contact it
    /// still overlaps, each scaled by the fraction of its own area covered.
    #[must_use]
    pub fn pushback(arena: &Arena, entity: &Entity) -> DVec2 {
        if !entity.body().is_collidable() {
            return DVec2::ZERO;
        }
        entity
            .body()
            .contacts()
            .iter()
            .filter_map(|contact| arena.get(contact.entity))
            .filter(|other| entity.intersects(other))
            .map(|other| {
                let away = (entity.body().position - other.body().position).normalize_or_zero();
                away * entity.body().rect().proportion_intersected(other.body().rect())
            })
            .sum()
    }
}

impl Resolver for PhysicsResolver {
    fn name(&self) -> &'static str {
        "physics"
    }

    fn resolve(&mut self, arena: &mut Arena, dt: Micros) {
        let nudges: Vec<(EntityId, DVec2)> = arena
            .entities_sorted()
            .map(|entity| (entity.id(), Self::pushback(arena, entity)))
            .filter(|(_, nudge)| *nudge != DVec2::ZERO)
            .collect();

        for (id, nudge) in nudges {
            if let Some(entity) = arena.get_mut(id) {
                entity.body_mut().velocity += nudge;
            }
        }

        for entity in arena.entities_sorted_mut() {
            entity.update(dt);
        }
    }
}
