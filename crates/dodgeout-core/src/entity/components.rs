//! Shared entity payload.
//!
//! Every entity, whatever its variant, carries a [`Body`]: kinematics, size,
//! mass, sprite, hitbox, status flags and the list of peers it is currently
//! in contact with. Variant-specific state lives in
//! [`PlayerComponents`](super::PlayerComponents) and
//! [`HazardComponents`](super::HazardComponents).

use bitflags::bitflags;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::{EntityId, EntityTag};
use crate::geometry::Rect;

// =============================================================================
// Status Flags
// =============================================================================

bitflags! {
    /// Physics status of an entity.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct StatusFlags: u8 {
        /// Takes part in collision response.
        const COLLIDABLE = 1 << 0;
        /// Tombstone: removed at the end of the current substep.
        const DELETABLE = 1 << 1;
    }
}

impl Default for StatusFlags {
    fn default() -> Self {
        Self::COLLIDABLE
    }
}

// =============================================================================
// Pattern
// =============================================================================

/// Sprite layout drawn around an entity's position.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    /// Plus-shaped sprite with arms of the entity's size.
    Cross,
    /// Filled rectangle of the entity's size.
    Square,
}

impl Pattern {
    /// Adjusts a requested size to one the pattern can draw symmetrically.
    ///
    /// Squares need an odd edge to centre on a cell, so even sizes round up.
    #[must_use]
    pub const fn fixed_size(self, size: i32) -> i32 {
        let size = if size < 1 { 1 } else { size };
        match self {
            Self::Square if size % 2 == 0 => size + 1,
            _ => size,
        }
    }
}

// =============================================================================
// HitBox
// =============================================================================

/// Cached collision rectangle.
///
/// The rectangle is only recomputed by an explicit [`HitBox::update`]; it goes
/// stale as soon as its owner moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HitBox {
    rect: Rect,
}

impl HitBox {
    /// Recomputes the rectangle around `position`.
    pub fn update(&mut self, position: DVec2, size_x: i32, size_y: i32) {
        self.rect = Rect::from_center(position, DVec2::new(f64::from(size_x), f64::from(size_y)));
    }

    /// The cached rectangle.
    #[must_use]
    pub const fn rect(&self) -> &Rect {
        &self.rect
    }
}

// =============================================================================
// Snapshots
// =============================================================================

/// Snapshot of an entity taken at the start of a collision pass.
///
/// Holds the peer's id, never the peer itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameInfo {
    /// The entity the snapshot describes.
    pub entity: EntityId,
    /// Its variant.
    pub tag: EntityTag,
    /// Its mass.
    pub mass: i32,
    /// Position at snapshot time.
    pub position: DVec2,
    /// Effective velocity at snapshot time.
    pub velocity: DVec2,
}

/// Damage one entity deals to another as a result of a collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strike {
    /// Entity receiving the damage.
    pub target: EntityId,
    /// Health to remove.
    pub damage: i32,
    /// Variant of the striking entity.
    pub attacker: EntityTag,
}

// =============================================================================
// Body
// =============================================================================

/// Kinematic and collision state shared by all entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Centre point. Only the player keeps this inside the arena.
    pub position: DVec2,
    /// Physics velocity in units per second.
    pub velocity: DVec2,
    /// Glyph drawn by the renderer.
    pub glyph: char,
    size_x: i32,
    size_y: i32,
    mass: i32,
    pattern: Pattern,
    hitbox: HitBox,
    flags: StatusFlags,
    contacts: Vec<FrameInfo>,
}

impl Body {
    /// Creates a collidable body with mass `size_x * size_y`.
    #[must_use]
    pub fn new(position: DVec2, size_x: i32, size_y: i32, pattern: Pattern, glyph: char) -> Self {
        let size_x = pattern.fixed_size(size_x);
        let size_y = pattern.fixed_size(size_y);
        let mut body = Self {
            position,
            velocity: DVec2::ZERO,
            glyph,
            size_x,
            size_y,
            mass: size_x.saturating_mul(size_y),
            pattern,
            hitbox: HitBox::default(),
            flags: StatusFlags::default(),
            contacts: Vec::new(),
        };
        body.update_hitbox();
        body
    }

    /// Overrides the size-derived mass.
    #[must_use]
    pub fn with_mass(mut self, mass: i32) -> Self {
        self.mass = mass;
        self
    }

    /// Sets the initial velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Horizontal size.
    #[must_use]
    pub const fn size_x(&self) -> i32 {
        self.size_x
    }

    /// Vertical size.
    #[must_use]
    pub const fn size_y(&self) -> i32 {
        self.size_y
    }

    /// Mass used by the elastic response.
    #[must_use]
    pub const fn mass(&self) -> i32 {
        self.mass
    }

    /// Sprite layout.
    #[must_use]
    pub const fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// The hitbox as of the last [`Body::update_hitbox`].
    #[must_use]
    pub const fn hitbox(&self) -> &HitBox {
        &self.hitbox
    }

    /// Shortcut for the hitbox rectangle.
    #[must_use]
    pub const fn rect(&self) -> &Rect {
        self.hitbox.rect()
    }

    /// Recomputes the hitbox from the current position and size.
    pub fn update_hitbox(&mut self) {
        self.hitbox.update(self.position, self.size_x, self.size_y);
    }

    /// Current status flags.
    #[must_use]
    pub const fn flags(&self) -> StatusFlags {
        self.flags
    }

    /// Whether the body takes part in collision response.
    #[must_use]
    pub const fn is_collidable(&self) -> bool {
        self.flags.contains(StatusFlags::COLLIDABLE)
    }

    /// Enables or disables collision response.
    pub fn set_collidable(&mut self, collidable: bool) {
        self.flags.set(StatusFlags::COLLIDABLE, collidable);
    }

    /// Whether the body is tombstoned.
    #[must_use]
    pub const fn is_deletable(&self) -> bool {
        self.flags.contains(StatusFlags::DELETABLE)
    }

    /// Tombstones the body. It stays in play until the end of the substep.
    pub fn mark_deletable(&mut self) {
        self.flags.insert(StatusFlags::DELETABLE);
    }

    // -------------------------------------------------------------------------
    // Contacts
    // -------------------------------------------------------------------------

    /// Peers this body is currently recorded as colliding with.
    #[must_use]
    pub fn contacts(&self) -> &[FrameInfo] {
        &self.contacts
    }

    /// Whether `other` is in the contact list.
    #[must_use]
    pub fn is_colliding_with(&self, other: EntityId) -> bool {
        self.contacts.iter().any(|c| c.entity == other)
    }

    /// Records a contact, replacing any older snapshot of the same peer.
    pub fn add_contact(&mut self, info: FrameInfo) {
        match self.contacts.iter_mut().find(|c| c.entity == info.entity) {
            Some(existing) => *existing = info,
            None => self.contacts.push(info),
        }
    }

    /// Keeps only the contacts for which `keep` returns true.
    pub fn retain_contacts(&mut self, keep: impl FnMut(&FrameInfo) -> bool) {
        self.contacts.retain(keep);
    }

    /// Drops every contact.
    pub fn clear_contacts(&mut self) {
        self.contacts.clear();
    }

    /// Drops contacts with any of `gone`.
    pub fn forget_contacts(&mut self, gone: &[EntityId]) {
        self.contacts.retain(|c| !gone.contains(&c.entity));
    }

    // -------------------------------------------------------------------------
    // Response
    // -------------------------------------------------------------------------

    /// Applies the two-body elastic correction along the line of centres and
    /// records `other` as a contact.
    ///
    /// Both velocities come from the pass snapshots. Coincident centres or a
    /// non-positive total mass skip the impulse but still record the contact.
    pub fn apply_elastic_impulse(&mut self, own: &FrameInfo, other: &FrameInfo) {
        let total_mass = own.mass.saturating_add(other.mass);
        let offset = own.position - other.position;
        let distance_sq = offset.length_squared();

        if total_mass > 0 && distance_sq > f64::EPSILON {
            let mass_factor = 2.0 * f64::from(other.mass) / f64::from(total_mass);
            let closing = (own.velocity - other.velocity).dot(offset) / distance_sq;
            self.velocity -= offset * mass_factor * closing;
        }
        self.add_contact(*other);
    }
}
