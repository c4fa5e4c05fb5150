//! State hashing for determinism verification.
//!
//! Two runs fed the same seed, difficulty and frame/input sequence must hash
//! equal after every frame.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::DVec2;

use crate::entity::{Entity, EntityInner};
use crate::simulation::GameSpace;

/// Compute a deterministic hash of a run.
///
/// This hash includes:
/// - Seed, difficulty, diagnostic flag and game-over state
/// - Countdown and spawn timers, carried micros, and the purge counter
/// - Every live entity in id order: kinematics, size, flags, contacts, and
///   variant state
#[must_use]
pub fn hash_game_space(game: &GameSpace) -> u64 {
    let mut hasher = DefaultHasher::new();

    game.seed().hash(&mut hasher);
    game.difficulty().hash(&mut hasher);
    game.is_diagnostic().hash(&mut hasher);
    game.is_game_over().hash(&mut hasher);
    game.carried_micros().hash(&mut hasher);
    game.deleted_count().hash(&mut hasher);

    let (countdown, spawn) = game.timers();
    countdown.hash(&mut hasher);
    spawn.hash(&mut hasher);

    game.arena().entity_count().hash(&mut hasher);
    for entity in game.arena().entities_sorted() {
        hash_entity(entity, &mut hasher);
    }

    hasher.finish()
}

fn hash_entity<H: Hasher>(entity: &Entity, hasher: &mut H) {
    let body = entity.body();
    entity.id().hash(hasher);
    entity.tag().hash(hasher);
    hash_vec(body.position, hasher);
    hash_vec(body.velocity, hasher);
    body.glyph.hash(hasher);
    body.size_x().hash(hasher);
    body.size_y().hash(hasher);
    body.mass().hash(hasher);
    body.flags().bits().hash(hasher);

    body.contacts().len().hash(hasher);
    for contact in body.contacts() {
        contact.entity.hash(hasher);
    }

    match entity.inner() {
        EntityInner::Player(player) => {
            0u8.hash(hasher);
            player.health.hash(hasher);
            hash_vec(player.input_velocity, hasher);
            player.flags().bits().hash(hasher);
            player.immunity().timer().hash(hasher);
        }
        EntityInner::Hazard(hazard) => {
            1u8.hash(hasher);
            hash_vec(hazard.acceleration, hasher);
            hazard.affected_by_gravity.hash(hasher);
        }
    }
}

/// Hash a vector by its float bit patterns.
fn hash_vec<H: Hasher>(v: DVec2, hasher: &mut H) {
    v.x.to_bits().hash(hasher);
    v.y.to_bits().hash(hasher);
}
