//! Falling hazards.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::components::{Body, Pattern};
use crate::consts::{DIAGNOSTIC_HAZARD_SIZE, GRAVITY, HAZARD_GLYPH, MAX_X, MICROS_PER_SECOND};
use crate::geometry::Position;
use crate::timer::Micros;

/// Hazard-specific state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardComponents {
    /// Constant acceleration in units/s².
    pub acceleration: DVec2,
    /// Whether [`GRAVITY`] is added to the acceleration.
    pub affected_by_gravity: bool,
}

impl HazardComponents {
    /// Total acceleration including gravity.
    #[must_use]
    pub fn total_acceleration(&self) -> DVec2 {
        if self.affected_by_gravity {
            self.acceleration + GRAVITY
        } else {
            self.acceleration
        }
    }

    /// Advances the hazard by `dt` microseconds.
    ///
    /// Semi-implicit Euler: velocity first, then position with the new
    /// velocity. The position is not clamped; once no hitbox corner is left
    /// inside the arena the body is tombstoned.
    #[allow(clippy::cast_precision_loss)]
    pub fn update(&self, body: &mut Body, dt: Micros) {
        let t = dt as f64 / MICROS_PER_SECOND;
        body.velocity += self.total_acceleration() * t;
        body.position += body.velocity * t;
        body.update_hitbox();

        if !body.rect().any_corner_in_arena() {
            body.mark_deletable();
        }
    }
}

/// Parameters for spawning a hazard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardSpawn {
    /// Spawn point; always inside the arena.
    pub position: Position,
    /// Requested width (squares round even sizes up).
    pub size_x: i32,
    /// Requested height (squares round even sizes up).
    pub size_y: i32,
    /// Initial velocity.
    pub velocity: DVec2,
    /// Constant acceleration.
    pub acceleration: DVec2,
    /// Whether gravity applies.
    pub affected_by_gravity: bool,
}

impl HazardSpawn {
    /// A stationary, gravity-free diagnostic hazard at `position`.
    #[must_use]
    pub fn at(position: Position) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Splits the spawn into the entity payloads.
    #[must_use]
    pub fn into_parts(self) -> (Body, HazardComponents) {
        let body = Body::new(
            self.position.get(),
            self.size_x,
            self.size_y,
            Pattern::Square,
            HAZARD_GLYPH,
        )
        .with_velocity(self.velocity);
        let hazard = HazardComponents {
            acceleration: self.acceleration,
            affected_by_gravity: self.affected_by_gravity,
        };
        (body, hazard)
    }
}

impl Default for HazardSpawn {
    fn default() -> Self {
        Self {
            position: Position::new(MAX_X / 2.0, 0.0),
            size_x: DIAGNOSTIC_HAZARD_SIZE,
            size_y: DIAGNOSTIC_HAZARD_SIZE,
            velocity: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            affected_by_gravity: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_Y;

    #[test]
    fn gravity_accelerates_downward() {
        let (mut body, hazard) = HazardSpawn {
            affected_by_gravity: true,
            ..HazardSpawn::default()
        }
        .into_parts();

        hazard.update(&mut body, 1_000_000);
        assert!((body.velocity.y - 9.81).abs() < 0.0001);
        assert!((body.position.y - 9.81).abs() < 0.0001);
    }

    #[test]
    fn no_gravity_keeps_constant_velocity() {
        let (mut body, hazard) = HazardSpawn {
            velocity: DVec2::new(2.0, 0.0),
            ..HazardSpawn::at(Position::new(10.0, 10.0))
        }
        .into_parts();

        hazard.update(&mut body, 500_000);
        assert_eq!(body.velocity, DVec2::new(2.0, 0.0));
        assert!((body.position.x - 11.0).abs() < 0.0001);
    }

    #[test]
    fn hitbox_follows_position() {
        let (mut body, hazard) = HazardSpawn {
            velocity: DVec2::new(0.0, 10.0),
            ..HazardSpawn::at(Position::new(50.0, 10.0))
        }
        .into_parts();

        hazard.update(&mut body, 1_000_000);
        assert!((body.rect().bottom() - 18.5).abs() < 0.0001);
    }

    #[test]
    fn leaving_arena_tombstones() {
        let (mut body, hazard) = HazardSpawn {
            velocity: DVec2::new(0.0, 20.0),
            ..HazardSpawn::default()
        }
        .into_parts();

        hazard.update(&mut body, 2_000_000);
        assert!(!body.is_deletable());
        hazard.update(&mut body, 1_000_000);
        assert!(body.position.y - 1.5 > MAX_Y);
        assert!(body.is_deletable());
    }

    #[test]
    fn partially_visible_hazard_survives() {
        let (mut body, hazard) = HazardSpawn {
            velocity: DVec2::new(0.0, -1.0),
            ..HazardSpawn::default()
        }
        .into_parts();

        hazard.update(&mut body, 1_000_000);
        assert!(body.position.y < 0.0);
        assert!(!body.is_deletable());
    }

    #[test]
    fn diagnostic_spawn_is_three_square() {
        let (body, hazard) = HazardSpawn::at(Position::new(20.0, 20.0)).into_parts();
        assert_eq!((body.size_x(), body.size_y()), (3, 3));
        assert_eq!(body.mass(), 9);
        assert_eq!(body.pattern(), Pattern::Square);
        assert!(!hazard.affected_by_gravity);
    }
}
