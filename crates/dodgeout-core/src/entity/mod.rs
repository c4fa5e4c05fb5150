//! Entity model.
//!
//! This module provides the entity types for the arena simulation:
//! - [`EntityId`]: Non-owning handle to an entity in the [`Arena`](crate::arena::Arena)
//! - [`EntityTag`]: Variant classification (player or hazard)
//! - [`EntityInner`]: Variant-specific state
//! - [`Entity`]: Shared [`Body`] plus variant state, with behavior
//!   dispatched by pattern match
//!
//! # Example
//!
//! ```
//! use dodgeout_core::entity::{Entity, EntityId, EntityInner, EntityTag, PlayerComponents};
//!
//! let player = Entity::new(
//!     EntityId::new(0),
//!     PlayerComponents::starting_body(),
//!     EntityInner::Player(PlayerComponents::new(4)),
//! );
//!
//! assert_eq!(player.tag(), EntityTag::Player);
//! assert!(!player.is_enemy());
//! ```

pub mod components;
pub mod hazard;
pub mod player;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{Body, FrameInfo, HitBox, Pattern, StatusFlags, Strike};
pub use hazard::{HazardComponents, HazardSpawn};
pub use player::{ImmunityAction, PlayerComponents, PlayerFlags};

use crate::consts::HAZARD_CONTACT_DAMAGE;
use crate::input::Direction;
use crate::timer::Micros;

/// Unique identifier for an entity.
///
/// Ids are assigned monotonically by the arena and never reused, so a stale
/// id simply fails to resolve once its entity is gone.
///
/// # Example
///
/// ```
/// use dodgeout_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Entity variant classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// The controllable entity.
    Player,
    /// A falling object that damages the player on contact.
    Hazard,
}

impl EntityTag {
    /// Whether entities of this variant can damage the player.
    #[must_use]
    pub const fn is_enemy(self) -> bool {
        matches!(self, Self::Hazard)
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Hazard => write!(f, "Hazard"),
        }
    }
}

/// Variant-specific entity state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Player state.
    Player(PlayerComponents),
    /// Hazard state.
    Hazard(HazardComponents),
}

impl EntityInner {
    /// Returns the tag matching this variant.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Player(_) => EntityTag::Player,
            Self::Hazard(_) => EntityTag::Hazard,
        }
    }

    /// Returns player state if this is a player.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerComponents> {
        match self {
            Self::Player(p) => Some(p),
            Self::Hazard(_) => None,
        }
    }

    /// Returns mutable player state if this is a player.
    #[must_use]
    pub fn as_player_mut(&mut self) -> Option<&mut PlayerComponents> {
        match self {
            Self::Player(p) => Some(p),
            Self::Hazard(_) => None,
        }
    }

    /// Returns hazard state if this is a hazard.
    #[must_use]
    pub const fn as_hazard(&self) -> Option<&HazardComponents> {
        match self {
            Self::Hazard(h) => Some(h),
            Self::Player(_) => None,
        }
    }

    /// Returns mutable hazard state if this is a hazard.
    #[must_use]
    pub fn as_hazard_mut(&mut self) -> Option<&mut HazardComponents> {
        match self {
            Self::Hazard(h) => Some(h),
            Self::Player(_) => None,
        }
    }
}

/// A live entity: shared body plus variant state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    tag: EntityTag,
    body: Body,
    inner: EntityInner,
}

impl Entity {
    /// Creates an entity. The tag is derived from `inner`.
    #[must_use]
    pub fn new(id: EntityId, body: Body, inner: EntityInner) -> Self {
        Self {
            id,
            tag: inner.tag(),
            body,
            inner,
        }
    }

    /// Returns the entity's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.tag
    }

    /// Shared body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Mutable shared body.
    #[must_use]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Variant state.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Mutable variant state.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut EntityInner {
        &mut self.inner
    }

    /// Returns true if this is the player.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self.tag, EntityTag::Player)
    }

    /// Returns true if this is a hazard.
    #[must_use]
    pub const fn is_hazard(&self) -> bool {
        matches!(self.tag, EntityTag::Hazard)
    }

    /// Whether this entity can damage the player.
    #[must_use]
    pub const fn is_enemy(&self) -> bool {
        self.tag.is_enemy()
    }

    /// Player state, if any.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerComponents> {
        self.inner.as_player()
    }

    /// Mutable player state, if any.
    #[must_use]
    pub fn as_player_mut(&mut self) -> Option<&mut PlayerComponents> {
        self.inner.as_player_mut()
    }

    /// Hazard state, if any.
    #[must_use]
    pub const fn as_hazard(&self) -> Option<&HazardComponents> {
        self.inner.as_hazard()
    }

    /// Mutable hazard state, if any.
    #[must_use]
    pub fn as_hazard_mut(&mut self) -> Option<&mut HazardComponents> {
        self.inner.as_hazard_mut()
    }

    /// Player health, if this is the player.
    #[must_use]
    pub fn health(&self) -> Option<i32> {
        self.as_player().map(|p| p.health)
    }

    // =========================================================================
    // Behavior
    // =========================================================================

    /// Velocity the entity actually moves with.
    ///
    /// For the player this is physics plus input velocity.
    #[must_use]
    pub fn effective_velocity(&self) -> DVec2 {
        match &self.inner {
            EntityInner::Player(p) => self.body.velocity + p.input_velocity,
            EntityInner::Hazard(_) => self.body.velocity,
        }
    }

    /// Snapshot for the current collision pass.
    #[must_use]
    pub fn frame_info(&self) -> FrameInfo {
        FrameInfo {
            entity: self.id,
            tag: self.tag,
            mass: self.body.mass(),
            position: self.body.position,
            velocity: self.effective_velocity(),
        }
    }

    /// Hitbox overlap test. An entity never intersects itself.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.id != other.id && self.body.rect().intersects(other.body.rect())
    }

    /// Advances the entity by `dt` microseconds.
    pub fn update(&mut self, dt: Micros) {
        match &mut self.inner {
            EntityInner::Player(p) => p.update(&mut self.body, dt),
            EntityInner::Hazard(h) => h.update(&mut self.body, dt),
        }
    }

    /// Responds to first contact with `other`.
    ///
    /// A hazard touching the player is consumed and returns the [`Strike`]
    /// the caller must deliver. Every other pairing gets the elastic
    /// response and records the contact.
    pub fn handle_collision(&mut self, own: &FrameInfo, other: &FrameInfo) -> Option<Strike> {
        match (&self.inner, other.tag) {
            (EntityInner::Hazard(_), EntityTag::Player) => {
                self.body.mark_deletable();
                Some(Strike {
                    target: other.entity,
                    damage: HAZARD_CONTACT_DAMAGE,
                    attacker: self.tag,
                })
            }
            _ => {
                self.body.apply_elastic_impulse(own, other);
                None
            }
        }
    }

    /// Damages the player. Returns false if ignored or not a player.
    pub fn take_damage(&mut self, damage: i32, attacker: EntityTag) -> bool {
        match &mut self.inner {
            EntityInner::Player(p) => p.take_damage(&mut self.body, damage, attacker),
            EntityInner::Hazard(_) => false,
        }
    }

    /// Heals the player. Negative amounts and non-players are ignored.
    pub fn heal(&mut self, amount: i32) {
        if let Some(p) = self.as_player_mut() {
            p.heal(amount);
        }
    }

    /// Feeds a resolved direction to the player's input channel.
    pub fn apply_move(&mut self, direction: Direction) {
        if let Some(p) = self.as_player_mut() {
            p.apply_move(direction);
        }
    }
}
