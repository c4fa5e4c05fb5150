//! Resolver module: the per-substep state transitions.
//!
//! A substep runs a fixed sequence of resolvers over the arena. Each resolver
//! owns one phase of the physics loop and mutates the arena in place.
//!
//! # Ordering
//!
//! The orchestrator runs [`PhysicsResolver`] before [`CollisionResolver`], so
//! every entity has finished integrating before the broad-phase grid is
//! rebuilt and before any pairwise response is computed.
//!
//! # Invariants
//!
//! - Resolvers MUST iterate entities in id order (via the arena's sorted iterators)
//! - Resolvers MUST NOT despawn entities; they only tombstone them
//! - Resolvers must be deterministic given the same arena state and `dt`
//!
//! # Available Resolvers
//!
//! - [`PhysicsResolver`]: Contact pushback and per-entity integration
//! - [`CollisionResolver`]: Broad-phase grid, narrow phase and collision response

mod collision;
mod physics;

pub use collision::CollisionResolver;
pub use physics::PhysicsResolver;

use crate::arena::Arena;
use crate::timer::Micros;

/// One phase of a physics substep.
///
/// # Example
///
/// ```
/// use dodgeout_core::arena::Arena;
/// use dodgeout_core::resolver::Resolver;
/// use dodgeout_core::timer::Micros;
///
/// struct Freeze;
///
/// impl Resolver for Freeze {
///     fn name(&self) -> &'static str {
///         "freeze"
///     }
///
///     fn resolve(&mut self, arena: &mut Arena, _dt: Micros) {
///         for entity in arena.entities_sorted_mut() {
///             entity.body_mut().velocity = glam::DVec2::ZERO;
///         }
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Applies this phase to the arena for a substep of `dt` microseconds.
    fn resolve(&mut self, arena: &mut Arena, dt: Micros);
}
