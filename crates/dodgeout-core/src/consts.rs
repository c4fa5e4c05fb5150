//! Compile-time tuning constants.
//!
//! Physics is deliberately not configurable at runtime: arena size, grid
//! resolution, gravity and the player's handling are fixed here.

use std::num::NonZeroU32;

use glam::DVec2;

// =============================================================================
// Arena & time
// =============================================================================

/// Arena width in logical units.
pub const MAX_X: f64 = 100.0;

/// Arena height in logical units. `+y` points down the screen.
pub const MAX_Y: f64 = 50.0;

/// Microseconds per second; all timers count microseconds.
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Downward acceleration applied to gravity-affected hazards, in units/s².
pub const GRAVITY: DVec2 = DVec2::new(0.0, 9.81);

/// Velocities shorter than this are treated as zero.
pub const VELOCITY_EPSILON: f64 = 1e-4;

// =============================================================================
// Substeps & broad phase
// =============================================================================

/// Physics substeps per rendered frame.
pub const PHYSICS_SUBSTEPS: u32 = 4;

const _: () = assert!(PHYSICS_SUBSTEPS >= 1, "at least one substep per frame");

/// Arena width as an integer grid extent. Matches [`MAX_X`].
pub const GRID_WIDTH: u32 = 100;

/// Arena height as an integer grid extent. Matches [`MAX_Y`].
pub const GRID_HEIGHT: u32 = 50;

/// Edge length of a broad-phase grid cell.
pub const COLLISION_CELL_SIZE: NonZeroU32 = match NonZeroU32::new(25) {
    Some(size) => size,
    None => panic!("cell size must be non-zero"),
};

// =============================================================================
// Spawning
// =============================================================================

/// Spawn cooldown before difficulty and progress scaling, in microseconds.
pub const SPAWN_COOLDOWN_BASE: f64 = 500_000.0;

/// Delay before the first hazard of a run, in microseconds.
pub const INITIAL_SPAWN_DELAY: i64 = 1_000_000;

/// Edge length of hazards spawned through the diagnostic trigger.
pub const DIAGNOSTIC_HAZARD_SIZE: i32 = 3;

/// Health removed from the player by a hazard strike.
pub const HAZARD_CONTACT_DAMAGE: i32 = 1;

// =============================================================================
// Player
// =============================================================================

/// Where the player starts each run.
pub const PLAYER_START: DVec2 = DVec2::new(50.0, 35.0);

/// Player hitbox edge length.
pub const PLAYER_SIZE: i32 = 2;

/// Player mass (overrides the size-derived default).
pub const PLAYER_MASS: i32 = 4;

/// Starting health.
pub const PLAYER_HEALTH: i32 = 4;

/// Starting health in diagnostic mode.
pub const PLAYER_DIAGNOSTIC_HEALTH: i32 = 9999;

/// Input velocity added per move, per axis (units/s).
pub const PLAYER_SPEED_INCREMENT: DVec2 = DVec2::new(25.0, 18.0);

/// Cap on the magnitude of the input velocity channel.
pub const PLAYER_MAX_SPEED: f64 = 70.0;

/// Decay rate of the physics velocity channel, per second.
pub const PLAYER_DRAG: f64 = 1.75;

/// Decay rate of the input velocity channel, per second.
pub const PLAYER_INPUT_DRAG: f64 = 4.0;

/// Length of the post-hit invulnerability window, in microseconds.
pub const PLAYER_IMMUNITY: i64 = 1_500_000;

/// Fraction of the immunity window after which movement is restored.
pub const PLAYER_MOVEMENT_LOCK_FRACTION: f64 = 0.15;

/// Number of glyph flicker steps spread over the immunity window.
pub const PLAYER_FLICKER_STEPS: u32 = 5;

/// Glyph drawn for the player.
pub const PLAYER_GLYPH: char = '*';

/// Alternate glyph shown while flickering.
pub const PLAYER_FLICKER_GLYPH: char = '!';

/// Glyph drawn for hazards.
pub const HAZARD_GLYPH: char = 'v';
