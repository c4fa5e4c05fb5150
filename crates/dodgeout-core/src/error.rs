//! Error types for the configuration boundary.
//!
//! The simulation itself never fails: invalid inputs to its operations are
//! ignored where they are applied. Errors only arise when turning outside
//! text (environment variables, menu choices) into a [`RunConfig`](crate::config::RunConfig).

use thiserror::Error;

/// A difficulty name or number that does not match any level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty `{input}` (expected easy, medium, hard or 30, 50, 75)")]
pub struct ParseDifficultyError {
    /// The rejected input.
    pub input: String,
}

/// Errors raised while loading or validating a run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The difficulty could not be parsed.
    #[error(transparent)]
    Difficulty(#[from] ParseDifficultyError),

    /// A run cannot start without a difficulty.
    #[error("difficulty must be set before a run starts")]
    DifficultyUnset,

    /// A variable held a value of the wrong shape.
    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Rejected value.
        value: String,
        /// What was expected.
        reason: &'static str,
    },
}
