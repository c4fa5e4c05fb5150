//! # Dodgeout Core
//!
//! Fixed-substep physics and collision core for Dodgeout, a 2D arena game in
//! which the player dodges falling hazards until a countdown runs out.
//!
//! The crate is a pure state machine: a host calls
//! [`GameSpace::update`](simulation::GameSpace::update) once per rendered
//! frame, feeds movement through
//! [`GameSpace::move_player`](simulation::GameSpace::move_player), and draws
//! whatever [`GameSpace::view`](simulation::GameSpace::view) returns. Timing,
//! key polling and drawing stay with the host.
//!
//! ## Architecture
//!
//! - **Arena**: the single owner of every entity; everything else holds ids
//! - **Entities**: a closed `{Player, Hazard}` variant over a shared [`Body`](entity::Body)
//! - **Resolvers**: physics integration, then broad phase and collision response
//! - **Simulation**: substeps, spawning, purging and run results
//!
//! ## Usage
//!
//! ```
//! use dodgeout_core::config::RunConfig;
//! use dodgeout_core::input::Direction;
//! use dodgeout_core::simulation::GameSpace;
//!
//! let mut game = GameSpace::from_config(&RunConfig::default());
//!
//! game.move_player(&[Direction::Left]);
//! let over = game.update(16_667);
//!
//! assert!(!over);
//! assert_eq!(game.view().sprites.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arena;
pub mod config;
pub mod consts;
pub mod difficulty;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod hash;
pub mod input;
pub mod resolver;
pub mod simulation;
pub mod timer;
pub mod world_view;

#[cfg(test)]
mod tests;

pub use arena::Arena;
pub use config::RunConfig;
pub use difficulty::Difficulty;
pub use entity::{Entity, EntityId, EntityTag};
pub use error::{ConfigError, ParseDifficultyError};
pub use hash::hash_game_space;
pub use input::Direction;
pub use simulation::{GameResults, GameSpace};
pub use world_view::WorldView;
