//! Player-controlled entity.
//!
//! The player has two velocity channels. Physics velocity lives on the
//! [`Body`] and is changed by collisions. Input velocity lives here and is
//! changed by [`PlayerComponents::apply_move`]. Both decay on their own and
//! are summed to move the player.
//!
//! A hit starts an invulnerability window driven by one [`ActionTimer`]:
//! movement comes back early, the glyph flickers throughout, and at the end
//! the player becomes collidable again.

use bitflags::bitflags;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::components::{Body, Pattern};
use super::EntityTag;
use crate::consts::{
    MICROS_PER_SECOND, PLAYER_DRAG, PLAYER_FLICKER_GLYPH, PLAYER_FLICKER_STEPS, PLAYER_GLYPH,
    PLAYER_IMMUNITY, PLAYER_INPUT_DRAG, PLAYER_MASS, PLAYER_MAX_SPEED,
    PLAYER_MOVEMENT_LOCK_FRACTION, PLAYER_SIZE, PLAYER_START, VELOCITY_EPSILON,
};
use crate::geometry::Position;
use crate::input::Direction;
use crate::timer::{ActionTimer, Micros};

bitflags! {
    /// Player-only status.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PlayerFlags: u8 {
        /// Ignores damage; set for the whole invulnerability window.
        const IMMUNE = 1 << 0;
        /// Ignores movement input.
        const MOVEMENT_DISABLED = 1 << 1;
    }
}

/// Effects scheduled over the invulnerability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImmunityAction {
    /// Accept movement input again.
    RestoreMovement,
    /// Switch the drawn glyph.
    Glyph(char),
}

/// Player-specific state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerComponents {
    /// Remaining health; the player is tombstoned at zero.
    pub health: i32,
    /// Velocity contributed by movement input.
    pub input_velocity: DVec2,
    flags: PlayerFlags,
    immunity: ActionTimer<ImmunityAction>,
}

impl PlayerComponents {
    /// Creates a player with `health` and the invulnerability schedule.
    #[must_use]
    pub fn new(health: i32) -> Self {
        let mut immunity = ActionTimer::new(PLAYER_IMMUNITY);
        immunity.add_action(
            "enable_player_movement",
            ImmunityAction::RestoreMovement,
            PLAYER_MOVEMENT_LOCK_FRACTION,
        );
        for step in 0..=PLAYER_FLICKER_STEPS {
            let glyph = if step % 2 == 0 {
                PLAYER_FLICKER_GLYPH
            } else {
                PLAYER_GLYPH
            };
            immunity.add_action(
                format!("player_glyph_{step}"),
                ImmunityAction::Glyph(glyph),
                f64::from(step) / f64::from(PLAYER_FLICKER_STEPS),
            );
        }

        Self {
            health,
            input_velocity: DVec2::ZERO,
            flags: PlayerFlags::empty(),
            immunity,
        }
    }

    /// The body every run starts with: a 2×2 cross in the lower middle.
    #[must_use]
    pub fn starting_body() -> Body {
        Body::new(PLAYER_START, PLAYER_SIZE, PLAYER_SIZE, Pattern::Cross, PLAYER_GLYPH)
            .with_mass(PLAYER_MASS)
    }

    /// Current flags.
    #[must_use]
    pub const fn flags(&self) -> PlayerFlags {
        self.flags
    }

    /// Whether damage is currently ignored.
    #[must_use]
    pub const fn is_immune(&self) -> bool {
        self.flags.contains(PlayerFlags::IMMUNE)
    }

    /// Whether movement input is currently ignored.
    #[must_use]
    pub const fn is_movement_disabled(&self) -> bool {
        self.flags.contains(PlayerFlags::MOVEMENT_DISABLED)
    }

    /// The invulnerability timer.
    #[must_use]
    pub const fn immunity(&self) -> &ActionTimer<ImmunityAction> {
        &self.immunity
    }

    /// Adds one step of `direction` to the input channel, capped at
    /// [`PLAYER_MAX_SPEED`]. Ignored while movement is disabled.
    pub fn apply_move(&mut self, direction: Direction) {
        if self.is_movement_disabled() {
            return;
        }
        let future = self.input_velocity + direction.increment();
        self.input_velocity = if future.length() > PLAYER_MAX_SPEED {
            future.normalize() * PLAYER_MAX_SPEED
        } else {
            future
        };
    }

    /// Adds health. Negative amounts are ignored.
    pub fn heal(&mut self, amount: i32) {
        if amount < 0 {
            return;
        }
        self.health = self.health.saturating_add(amount);
    }

    /// Applies damage from `attacker`.
    ///
    /// Ignored for non-enemy attackers, negative damage, or while immune.
    /// Otherwise the input channel stops, the invulnerability window starts,
    /// and the body is tombstoned once health reaches zero.
    pub fn take_damage(&mut self, body: &mut Body, damage: i32, attacker: EntityTag) -> bool {
        if !attacker.is_enemy() || damage < 0 || self.is_immune() {
            return false;
        }

        self.input_velocity = DVec2::ZERO;
        self.flags
            .insert(PlayerFlags::IMMUNE | PlayerFlags::MOVEMENT_DISABLED);
        body.set_collidable(false);
        self.health = self.health.saturating_sub(damage);
        debug!(damage, health = self.health, %attacker, "player hit");

        if self.health <= 0 {
            body.mark_deletable();
            debug!("player health depleted");
        }
        true
    }

    /// Advances the player by `dt` microseconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn update(&mut self, body: &mut Body, dt: Micros) {
        let t = dt as f64 / MICROS_PER_SECOND;

        if body.velocity.length() > VELOCITY_EPSILON {
            let rect = *body.rect();
            if rect.touches_horizontal_edge() {
                body.velocity.y = 0.0;
            }
            if rect.touches_vertical_edge() {
                body.velocity.x = 0.0;
            }
            body.velocity *= decay(PLAYER_DRAG, t);
        }
        if self.input_velocity.length() > VELOCITY_EPSILON {
            self.input_velocity *= decay(PLAYER_INPUT_DRAG, t);
        }

        let mut position = Position::from(body.position);
        position.translate((body.velocity + self.input_velocity) * t);
        body.position = position.get();
        body.update_hitbox();

        if self.is_immune() {
            self.tick_immunity(body, dt);
        }
    }

    fn tick_immunity(&mut self, body: &mut Body, dt: Micros) {
        body.set_collidable(false);
        for action in self.immunity.update(dt) {
            match action {
                ImmunityAction::RestoreMovement => {
                    self.flags.remove(PlayerFlags::MOVEMENT_DISABLED);
                }
                ImmunityAction::Glyph(glyph) => body.glyph = glyph,
            }
        }

        if !self.immunity.is_over() {
            return;
        }
        self.immunity.reset();
        self.flags.remove(PlayerFlags::IMMUNE | PlayerFlags::MOVEMENT_DISABLED);
        body.set_collidable(true);
        debug!("player immunity ended");
    }
}

/// Linear per-step decay factor, floored at zero for very long steps.
fn decay(rate: f64, t: f64) -> f64 {
    (1.0 - rate * t).max(0.0)
}
