//! Test helper functions for setting up runs and entities.

use glam::DVec2;

use crate::difficulty::Difficulty;
use crate::entity::{EntityId, HazardSpawn};
use crate::geometry::Position;
use crate::simulation::GameSpace;

/// Frame length used by the tests: about 60 frames per second.
pub const FRAME: i64 = 16_667;

/// Installs a test-writer tracing subscriber. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// =============================================================================
// Run Setup
// =============================================================================

/// An easy, non-diagnostic run with seed 42.
pub fn easy_game() -> GameSpace {
    GameSpace::new(Difficulty::Easy, false, 42)
}

/// Runs `frames` frames of [`FRAME`] length. Returns true if the run ended.
pub fn run_frames(game: &mut GameSpace, frames: usize) -> bool {
    for _ in 0..frames {
        if game.update(FRAME) {
            return true;
        }
    }
    false
}

/// Spawns a hazard of the given size and velocity, no gravity.
pub fn spawn_moving_hazard(
    game: &mut GameSpace,
    position: DVec2,
    size: i32,
    velocity: DVec2,
) -> EntityId {
    game.spawn_hazard(HazardSpawn {
        position: Position::from(position),
        size_x: size,
        size_y: size,
        velocity,
        ..HazardSpawn::default()
    })
}

// =============================================================================
// State Accessors
// =============================================================================

/// Position of an entity, if alive.
pub fn get_position(game: &GameSpace, id: EntityId) -> Option<DVec2> {
    game.arena().get(id).map(|e| e.body().position)
}

/// Physics velocity of an entity, if alive.
pub fn get_velocity(game: &GameSpace, id: EntityId) -> Option<DVec2> {
    game.arena().get(id).map(|e| e.body().velocity)
}

/// Player health, or `None` once the player is gone.
pub fn player_health(game: &GameSpace) -> Option<i32> {
    game.player().and_then(|p| p.health())
}

/// Whether the player is currently immune.
pub fn player_immune(game: &GameSpace) -> bool {
    game.player()
        .and_then(|p| p.as_player())
        .is_some_and(|p| p.is_immune())
}

/// Keeps the player out of collisions for the rest of the current frame.
pub fn ghost_player(game: &mut GameSpace) {
    if let Some(player) = game.player_mut() {
        player.body_mut().set_collidable(false);
    }
}
