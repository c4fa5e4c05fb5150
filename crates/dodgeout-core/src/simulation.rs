//! Simulation module: the per-run orchestrator.
//!
//! A [`GameSpace`] owns everything a run needs: the arena, the countdown and
//! spawn timers, both resolvers, and the seeded spawner. A host drives it
//! with one [`GameSpace::update`] call per rendered frame.
//!
//! # Substep loop
//!
//! Each frame is split into [`PHYSICS_SUBSTEPS`] equal substeps. For each:
//!
//! 1. Advance the countdown and spawn timers; stop the frame if the countdown is over
//! 2. Spawn a hazard if the spawn cooldown has elapsed, then re-arm it
//! 3. [`PhysicsResolver`]: pushback and per-entity integration
//! 4. [`CollisionResolver`]: grid rebuild, narrow phase and response
//! 5. Purge every tombstoned entity and scrub it from all contact records.
//!    Purging the player ends the run, but the frame still finishes
//!
//! Entities tombstoned during a substep stay in the arena, and keep
//! interacting, until step 5 of that substep.
//!
//! # Determinism
//!
//! Hazards are drawn from a `ChaCha8Rng` seeded from the run seed, entities
//! are iterated in id order, and the integer remainder of every frame is
//! carried into the next. Equal seeds and equal inputs give equal runs.
//!
//! # Example
//!
//! ```
//! use dodgeout_core::difficulty::Difficulty;
//! use dodgeout_core::simulation::GameSpace;
//!
//! let mut game = GameSpace::new(Difficulty::Easy, false, 42);
//!
//! // one second at roughly 60 frames per second
//! for _ in 0..60 {
//!     if game.update(16_667) {
//!         break;
//!     }
//! }
//!
//! assert!(game.elapsed() > 900_000);
//! ```

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::arena::Arena;
use crate::config::RunConfig;
use crate::consts::{
    INITIAL_SPAWN_DELAY, MAX_X, MICROS_PER_SECOND, PHYSICS_SUBSTEPS, PLAYER_DIAGNOSTIC_HEALTH,
    PLAYER_HEALTH, SPAWN_COOLDOWN_BASE,
};
use crate::difficulty::Difficulty;
use crate::entity::{Entity, EntityId, EntityInner, HazardSpawn, PlayerComponents};
use crate::geometry::Position;
use crate::input::{resolve_direction, Direction};
use crate::resolver::{CollisionResolver, PhysicsResolver, Resolver};
use crate::timer::{Micros, Timer};

// =============================================================================
// GameResults
// =============================================================================

/// Outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResults {
    /// Difficulty the run was played on.
    pub difficulty: Difficulty,
    /// Time survived.
    pub elapsed_micros: Micros,
    /// Whether the countdown ran out before the player did.
    pub won: bool,
    /// Player health left, zero if the player died.
    pub lives_remaining: i32,
}

// =============================================================================
// GameSpace
// =============================================================================

/// The orchestrator for one run.
///
/// The player is an ordinary arena entity; `GameSpace` keeps its id as a
/// non-owning alias that is cleared when the player is purged.
#[derive(Debug, Clone)]
pub struct GameSpace {
    arena: Arena,
    player: Option<EntityId>,
    game_timer: Timer,
    spawn_timer: Timer,
    physics: PhysicsResolver,
    collision: CollisionResolver,
    rng: ChaCha8Rng,
    seed: u64,
    difficulty: Difficulty,
    diagnostic: bool,
    deleted_count: u64,
    game_over: bool,
    /// Microseconds left over from the last frame's division into substeps.
    carry: Micros,
}

impl GameSpace {
    /// Starts a run.
    ///
    /// In diagnostic mode the player starts with near-infinite health.
    #[must_use]
    pub fn new(difficulty: Difficulty, diagnostic: bool, seed: u64) -> Self {
        let mut game = Self {
            arena: Arena::new(),
            player: None,
            game_timer: Timer::new(difficulty.seconds() * 1_000_000),
            spawn_timer: Timer::new(INITIAL_SPAWN_DELAY),
            physics: PhysicsResolver::new(),
            collision: CollisionResolver::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            difficulty,
            diagnostic,
            deleted_count: 0,
            game_over: false,
            carry: 0,
        };
        game.spawn_player();
        info!(%difficulty, diagnostic, seed, "run started");
        game
    }

    /// Starts a run from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.difficulty, config.diagnostic, config.seed)
    }

    /// Tears the current run down and starts a fresh one with the same seed.
    pub fn reset(&mut self, difficulty: Difficulty, diagnostic: bool) {
        self.arena.clear();
        self.collision.clear();
        self.player = None;
        self.game_timer = Timer::new(difficulty.seconds() * 1_000_000);
        self.spawn_timer = Timer::new(INITIAL_SPAWN_DELAY);
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.difficulty = difficulty;
        self.diagnostic = diagnostic;
        self.deleted_count = 0;
        self.game_over = false;
        self.carry = 0;
        self.spawn_player();
        info!(%difficulty, diagnostic, seed = self.seed, "run reset");
    }

    fn spawn_player(&mut self) {
        let health = if self.diagnostic {
            PLAYER_DIAGNOSTIC_HEALTH
        } else {
            PLAYER_HEALTH
        };
        let id = self.arena.spawn(
            PlayerComponents::starting_body(),
            EntityInner::Player(PlayerComponents::new(health)),
        );
        self.player = Some(id);
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    /// Advances the run by `frame_time` microseconds.
    ///
    /// Returns true once the run is over, either because the countdown ran
    /// out or because the player was purged. A finished run is terminal:
    /// later calls return true without simulating. Negative frame times are
    /// ignored.
    pub fn update(&mut self, frame_time: Micros) -> bool {
        if self.game_over {
            return true;
        }
        if frame_time <= 0 {
            return false;
        }

        let substeps = Micros::from(PHYSICS_SUBSTEPS);
        let total = frame_time.saturating_add(self.carry);
        let dt = total / substeps;
        self.carry = total % substeps;

        for _ in 0..PHYSICS_SUBSTEPS {
            if self.substep(dt) {
                self.game_over = true;
                break;
            }
        }

        if self.game_over {
            let results = self.get_game_results();
            info!(
                won = results.won,
                elapsed = results.elapsed_micros,
                lives = results.lives_remaining,
                deleted = self.deleted_count,
                "run over"
            );
        }
        self.game_over
    }

    /// Runs one substep. Returns true if the countdown ran out.
    ///
    /// A player purged here ends the run, but the frame's remaining substeps
    /// still run.
    fn substep(&mut self, dt: Micros) -> bool {
        self.game_timer.update(dt);
        self.spawn_timer.update(dt);
        if self.game_timer.is_over() {
            return true;
        }

        if self.spawn_timer.is_over() {
            self.spawn_hazard_random();
            let cooldown = self.next_spawn_cooldown();
            self.spawn_timer.set_time_to_reach(cooldown);
            self.spawn_timer.reset();
        }

        self.physics.resolve(&mut self.arena, dt);
        self.collision.resolve(&mut self.arena, dt);

        if self.purge() {
            self.game_over = true;
        }
        false
    }

    /// Removes every tombstoned entity and scrubs it from contact records.
    ///
    /// Returns true if the player was among them.
    fn purge(&mut self) -> bool {
        let doomed = self.arena.deletable_ids();
        if doomed.is_empty() {
            return false;
        }

        let mut player_died = false;
        for &id in &doomed {
            if self.player == Some(id) {
                self.player = None;
                player_died = true;
            }
            if self.arena.despawn(id).is_some() {
                self.deleted_count += 1;
            }
        }
        for entity in self.arena.entities_sorted_mut() {
            entity.body_mut().forget_contacts(&doomed);
        }
        player_died
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    /// Cooldown until the next spawn, given how far the run has progressed.
    #[must_use]
    pub fn next_spawn_cooldown(&self) -> Micros {
        spawn_cooldown(self.difficulty, self.game_timer.proportion_elapsed())
    }

    /// Draws a random falling hazard along the top edge.
    #[allow(clippy::cast_possible_truncation)]
    fn random_hazard(&mut self) -> HazardSpawn {
        let scale = self.difficulty.spawn_scale();
        let max_size_x = (6.0 + 1.5 * scale).floor() as i32;
        let max_size_y = (4.0 + 1.5 * scale).floor() as i32;

        let x = self.rng.gen_range(0..MAX_X as i32);
        let size_x = self.rng.gen_range(1..=max_size_x);
        let size_y = self.rng.gen_range(1..=max_size_y);
        let sign = if self.rng.gen_bool(0.5) { -1.0 } else { 1.0 };
        let accel_x = sign * f64::from(self.rng.gen_range(0..10)) / 10.0;
        let velocity_y = 4.0 * (self.rng.gen::<f64>() - 0.5) * scale;

        HazardSpawn {
            position: Position::new(f64::from(x), 0.0),
            size_x,
            size_y,
            velocity: DVec2::new(0.0, velocity_y),
            acceleration: DVec2::new(accel_x, 0.0),
            affected_by_gravity: true,
        }
    }

    /// Spawns a hazard from explicit parameters.
    pub fn spawn_hazard(&mut self, spawn: HazardSpawn) -> EntityId {
        let (body, hazard) = spawn.into_parts();
        self.arena.spawn(body, EntityInner::Hazard(hazard))
    }

    /// Spawns a random falling hazard, as the spawn timer does.
    pub fn spawn_hazard_random(&mut self) -> EntityId {
        let spawn = self.random_hazard();
        debug!(
            x = spawn.position.x(),
            size_x = spawn.size_x,
            size_y = spawn.size_y,
            vy = spawn.velocity.y,
            "random hazard"
        );
        self.spawn_hazard(spawn)
    }

    /// Spawns a stationary 3×3 hazard at `position`.
    pub fn spawn_hazard_at(&mut self, position: Position) -> EntityId {
        self.spawn_hazard(HazardSpawn::at(position))
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Feeds this frame's directional inputs to the player.
    pub fn move_player(&mut self, inputs: &[Direction]) {
        let direction = resolve_direction(inputs);
        if let Some(player) = self.player_mut() {
            player.apply_move(direction);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The player, if still alive.
    #[must_use]
    pub fn player(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.arena.get(id))
    }

    /// The player, mutably.
    #[must_use]
    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.player.and_then(|id| self.arena.get_mut(id))
    }

    /// The player's id, if still alive.
    #[must_use]
    pub const fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    /// All live entities.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// All live entities, mutably.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// The broad phase as of the last substep.
    #[must_use]
    pub const fn collision(&self) -> &CollisionResolver {
        &self.collision
    }

    /// Outcome so far; final once [`GameSpace::is_game_over`] is true.
    #[must_use]
    pub fn get_game_results(&self) -> GameResults {
        GameResults {
            difficulty: self.difficulty,
            elapsed_micros: self.game_timer.elapsed(),
            won: self.game_timer.is_over(),
            lives_remaining: self
                .player()
                .and_then(Entity::health)
                .unwrap_or(0),
        }
    }

    /// Whether the run has ended.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Run time elapsed.
    #[must_use]
    pub const fn elapsed(&self) -> Micros {
        self.game_timer.elapsed()
    }

    /// Run time left; negative once overshot.
    #[must_use]
    pub const fn time_remaining(&self) -> Micros {
        self.game_timer.time_remaining()
    }

    /// Whole seconds left, floored at zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn seconds_remaining(&self) -> i64 {
        (self.time_remaining().max(0) as f64 / MICROS_PER_SECOND) as i64
    }

    /// Entities purged this run.
    #[must_use]
    pub const fn deleted_count(&self) -> u64 {
        self.deleted_count
    }

    /// Difficulty of the current run.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Whether diagnostic mode is on.
    #[must_use]
    pub const fn is_diagnostic(&self) -> bool {
        self.diagnostic
    }

    /// Seed the spawner is reseeded from on every reset.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Remaining countdown and spawn timers.
    #[must_use]
    pub const fn timers(&self) -> (&Timer, &Timer) {
        (&self.game_timer, &self.spawn_timer)
    }

    /// Microseconds carried into the next frame.
    #[must_use]
    pub const fn carried_micros(&self) -> Micros {
        self.carry
    }
}

/// Spawn cooldown at `progress` (elapsed / target, clamped to `[0, 1]`).
///
/// Shrinks linearly from 1.1× to 0.6× the base cooldown over the run, and is
/// divided by the difficulty's spawn scale.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn spawn_cooldown(difficulty: Difficulty, progress: f64) -> Micros {
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let factor = (1.1 - 0.5 * progress) / difficulty.spawn_scale();
    (SPAWN_COOLDOWN_BASE * factor) as Micros
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_START;

    fn game() -> GameSpace {
        GameSpace::new(Difficulty::Easy, false, 7)
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn new_run_has_only_the_player() {
            let game = game();
            assert_eq!(game.arena().entity_count(), 1);
            let player = game.player().unwrap();
            assert!(player.is_player());
            assert_eq!(player.health(), Some(PLAYER_HEALTH));
            assert_eq!(player.body().position, PLAYER_START);
            assert!(!game.is_game_over());
            assert_eq!(game.time_remaining(), 30_000_000);
        }

        #[test]
        fn diagnostic_player_is_sturdy() {
            let game = GameSpace::new(Difficulty::Easy, true, 0);
            assert_eq!(game.player().unwrap().health(), Some(PLAYER_DIAGNOSTIC_HEALTH));
            assert!(game.is_diagnostic());
        }

        #[test]
        fn from_config_copies_settings() {
            let config = RunConfig {
                difficulty: Difficulty::Hard,
                diagnostic: true,
                seed: 99,
            };
            let game = GameSpace::from_config(&config);
            assert_eq!(game.difficulty(), Difficulty::Hard);
            assert!(game.is_diagnostic());
            assert_eq!(game.seed(), 99);
        }

        #[test]
        fn reset_starts_over() {
            let mut game = game();
            game.spawn_hazard_at(Position::new(10.0, 10.0));
            game.update(2_000_000);
            game.reset(Difficulty::Medium, false);

            assert_eq!(game.arena().entity_count(), 1);
            assert_eq!(game.elapsed(), 0);
            assert_eq!(game.deleted_count(), 0);
            assert_eq!(game.time_remaining(), 50_000_000);
            assert!(game.player().is_some());
        }

        #[test]
        fn reset_revives_a_finished_run() {
            let mut game = game();
            game.player_mut().unwrap().take_damage(PLAYER_HEALTH, crate::entity::EntityTag::Hazard);
            assert!(game.update(10_000));
            game.reset(Difficulty::Easy, false);
            assert!(!game.is_game_over());
            assert!(!game.update(10_000));
        }
    }

    mod frame_tests {
        use super::*;

        #[test]
        fn frame_is_split_into_substeps_with_carry() {
            let mut game = game();
            game.update(10);
            assert_eq!(game.elapsed(), 8);
            assert_eq!(game.carried_micros(), 2);
            game.update(2);
            assert_eq!(game.elapsed(), 12);
            assert_eq!(game.carried_micros(), 0);
        }

        #[test]
        fn non_positive_frames_do_nothing() {
            let mut game = game();
            assert!(!game.update(0));
            assert!(!game.update(-5));
            assert_eq!(game.elapsed(), 0);
        }

        #[test]
        fn countdown_expiry_wins() {
            let mut game = game();
            let mut over = false;
            for _ in 0..40 {
                game.player_mut().unwrap().body_mut().set_collidable(false);
                over = game.update(1_000_000);
                if over {
                    break;
                }
            }
            assert!(over);
            let results = game.get_game_results();
            assert!(results.won);
            assert!(results.elapsed_micros >= 30_000_000);
        }

        #[test]
        fn unset_difficulty_ends_immediately() {
            let mut game = GameSpace::new(Difficulty::NotSet, false, 0);
            assert!(game.update(1_000));
            assert!(game.get_game_results().won);
        }

        #[test]
        fn lethal_hit_still_finishes_the_frame() {
            let mut game = game();
            let hazard = game.spawn_hazard(HazardSpawn {
                position: Position::new(10.0, 10.0),
                size_x: 1,
                size_y: 1,
                velocity: DVec2::new(4.0, 0.0),
                acceleration: DVec2::ZERO,
                affected_by_gravity: false,
            });
            game.player_mut().unwrap().take_damage(PLAYER_HEALTH, crate::entity::EntityTag::Hazard);

            assert!(game.update(16_000));
            assert!(game.is_game_over());
            assert!(game.player().is_none());
            assert_eq!(game.elapsed(), 16_000);
            assert_eq!(game.get_game_results().elapsed_micros, 16_000);

            // four substeps of 4 ms at 4 units per second
            let x = game.arena().get(hazard).unwrap().body().position.x;
            assert!((x - 10.064).abs() < 0.0001, "x = {x}");
        }

        #[test]
        fn finished_run_is_terminal() {
            let mut game = game();
            game.player_mut().unwrap().take_damage(PLAYER_HEALTH, crate::entity::EntityTag::Hazard);
            assert!(game.update(16_000));
            let elapsed = game.elapsed();
            assert!(game.update(16_000));
            assert_eq!(game.elapsed(), elapsed);
        }
    }

    mod spawn_tests {
        use super::*;

        #[test]
        fn first_spawn_after_initial_delay() {
            let mut game = game();
            game.update(INITIAL_SPAWN_DELAY - 4);
            assert_eq!(game.arena().entity_count(), 1);
            game.update(4);
            assert_eq!(game.arena().entity_count(), 2);
        }

        #[test]
        fn random_hazards_respect_bounds() {
            let mut game = GameSpace::new(Difficulty::Hard, false, 3);
            for _ in 0..200 {
                let spawn = game.random_hazard();
                assert!((0.0..MAX_X).contains(&spawn.position.x()));
                assert!(spawn.position.y().abs() < 0.0001);
                assert!((1..=9).contains(&spawn.size_x));
                assert!((1..=7).contains(&spawn.size_y));
                assert!(spawn.acceleration.x.abs() <= 0.9 + 0.0001);
                assert!(spawn.velocity.y.abs() <= 2.0 * 2.5 + 0.0001);
                assert!(spawn.affected_by_gravity);
            }
        }

        #[test]
        fn cooldown_scales_with_difficulty() {
            let easy = GameSpace::new(Difficulty::Easy, false, 0);
            let hard = GameSpace::new(Difficulty::Hard, false, 0);
            assert_eq!(easy.next_spawn_cooldown(), 550_000);
            assert_eq!(hard.next_spawn_cooldown(), 220_000);
        }

        #[test]
        fn diagnostic_spawn_is_stationary() {
            let mut game = game();
            let id = game.spawn_hazard_at(Position::new(20.0, 20.0));
            let hazard = game.arena().get(id).unwrap();
            assert!(hazard.is_hazard());
            assert_eq!(hazard.body().size_x(), 3);
            assert_eq!(hazard.body().velocity, DVec2::ZERO);
        }
    }

    mod purge_tests {
        use super::*;

        #[test]
        fn tombstoned_entities_are_counted_and_scrubbed() {
            let mut game = game();
            let a = game.spawn_hazard_at(Position::new(10.0, 10.0));
            let b = game.spawn_hazard_at(Position::new(11.0, 10.0));
            let info = game.arena().frame_info(b).unwrap();
            game.arena_mut().get_mut(a).unwrap().body_mut().add_contact(info);
            game.arena_mut().get_mut(b).unwrap().body_mut().mark_deletable();

            assert!(!game.purge());
            assert!(!game.arena().contains(b));
            assert!(game.arena().get(a).unwrap().body().contacts().is_empty());
            assert_eq!(game.deleted_count(), 1);
        }

        #[test]
        fn purging_the_player_ends_the_run() {
            let mut game = game();
            game.player_mut().unwrap().body_mut().mark_deletable();
            assert!(game.purge());
            assert!(game.player().is_none());
            assert_eq!(game.get_game_results().lives_remaining, 0);
        }
    }

    mod input_tests {
        use super::*;

        #[test]
        fn move_player_feeds_the_input_channel() {
            let mut game = game();
            game.move_player(&[Direction::Up, Direction::Left]);
            let v = game.player().unwrap().as_player().unwrap().input_velocity;
            assert!(v.x < 0.0);
            assert!(v.y != 0.0);
        }

        #[test]
        fn cancelling_inputs_do_nothing() {
            let mut game = game();
            game.move_player(&[Direction::Left, Direction::Right]);
            let v = game.player().unwrap().as_player().unwrap().input_velocity;
            assert_eq!(v, DVec2::ZERO);
        }
    }
}
