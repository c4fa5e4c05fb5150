//! Run configuration.
//!
//! Physics is fixed at compile time (see [`crate::consts`]); the only knobs
//! a host can turn are which difficulty to play, whether diagnostic mode is
//! on, and the seed for hazard spawning.
//!
//! | Variable              | Meaning                                  |
//! |-----------------------|------------------------------------------|
//! | `DODGEOUT_DIFFICULTY` | `easy`, `medium`, `hard` or `30/50/75`   |
//! | `DODGEOUT_DIAGNOSTIC` | `1/true/yes/on` or `0/false/no/off`      |
//! | `DODGEOUT_SEED`       | unsigned 64-bit seed                     |

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::difficulty::Difficulty;
use crate::error::ConfigError;

/// Environment variable holding the difficulty.
pub const ENV_DIFFICULTY: &str = "DODGEOUT_DIFFICULTY";
/// Environment variable toggling diagnostic mode.
pub const ENV_DIAGNOSTIC: &str = "DODGEOUT_DIAGNOSTIC";
/// Environment variable holding the spawn seed.
pub const ENV_SEED: &str = "DODGEOUT_SEED";

/// Settings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Run length and spawn scaling.
    pub difficulty: Difficulty,
    /// Near-infinite health, manual spawns and extra overlay data.
    pub diagnostic: bool,
    /// Seed for the hazard spawner.
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            diagnostic: false,
            seed: 0,
        }
    }
}

impl RunConfig {
    /// Loads config from the process environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads config through `lookup`, falling back to the default for every
    /// missing or malformed value. Malformed values are logged.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_DIFFICULTY) {
            match raw.parse::<Difficulty>() {
                Ok(difficulty) => config.difficulty = difficulty,
                Err(err) => warn!("{err}, using {}", config.difficulty),
            }
        }

        if let Some(raw) = lookup(ENV_DIAGNOSTIC) {
            match parse_flag(ENV_DIAGNOSTIC, &raw) {
                Ok(diagnostic) => config.diagnostic = diagnostic,
                Err(err) => warn!("{err}, diagnostic mode off"),
            }
        }

        if let Some(raw) = lookup(ENV_SEED) {
            match parse_seed(&raw) {
                Ok(seed) => config.seed = seed,
                Err(err) => warn!("{err}, using seed {}", config.seed),
            }
        }

        config
    }

    /// Like [`RunConfig::from_lookup`], but rejects malformed values instead
    /// of defaulting them. Missing values still take their default.
    ///
    /// # Errors
    ///
    /// Returns the first malformed value, or [`ConfigError::DifficultyUnset`]
    /// if the result would not validate.
    pub fn try_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_DIFFICULTY) {
            config.difficulty = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_DIAGNOSTIC) {
            config.diagnostic = parse_flag(ENV_DIAGNOSTIC, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            config.seed = parse_seed(&raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks that a run can start with this config.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DifficultyUnset`] when no difficulty was chosen.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulty == Difficulty::NotSet {
            return Err(ConfigError::DifficultyUnset);
        }
        Ok(())
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: "expected a boolean flag",
        }),
    }
}

fn parse_seed(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue {
            key: ENV_SEED.to_string(),
            value: raw.to_string(),
            reason: "expected an unsigned integer",
        })
}
