//! Difficulty levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseDifficultyError;

/// How long a run lasts and how hard it hits.
///
/// The discriminant is both the run length in seconds and the basis of the
/// spawn scaling factor (`value / 30`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    /// No level chosen yet.
    #[default]
    NotSet = 0,
    /// 30 second run.
    Easy = 30,
    /// 50 second run.
    Medium = 50,
    /// 75 second run.
    Hard = 75,
}

impl Difficulty {
    /// Run length in seconds. Zero for [`Difficulty::NotSet`].
    #[must_use]
    pub const fn seconds(self) -> i64 {
        self as i64
    }

    /// Spawn scaling relative to [`Difficulty::Easy`].
    ///
    /// `NotSet` scales like `Easy` so spawn maths never divides by zero.
    #[must_use]
    pub fn spawn_scale(self) -> f64 {
        match self {
            Self::NotSet => 1.0,
            level => f64::from(level as u8) / f64::from(Self::Easy as u8),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSet => write!(f, "NotSet"),
            Self::Easy => write!(f, "Easy"),
            Self::Medium => write!(f, "Medium"),
            Self::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "30" => Ok(Self::Easy),
            "medium" | "50" => Ok(Self::Medium),
            "hard" | "75" => Ok(Self::Hard),
            "notset" | "unset" | "0" => Ok(Self::NotSet),
            _ => Err(ParseDifficultyError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_match_discriminant() {
        assert_eq!(Difficulty::NotSet.seconds(), 0);
        assert_eq!(Difficulty::Easy.seconds(), 30);
        assert_eq!(Difficulty::Medium.seconds(), 50);
        assert_eq!(Difficulty::Hard.seconds(), 75);
    }

    #[test]
    fn spawn_scale_is_relative_to_easy() {
        assert!((Difficulty::Easy.spawn_scale() - 1.0).abs() < 0.0001);
        assert!((Difficulty::Hard.spawn_scale() - 2.5).abs() < 0.0001);
        assert!((Difficulty::NotSet.spawn_scale() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn display_names() {
        assert_eq!(Difficulty::NotSet.to_string(), "NotSet");
        assert_eq!(Difficulty::Medium.to_string(), "Medium");
    }

    #[test]
    fn parse_names_and_numbers() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" 50 ".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert!("nightmare".parse::<Difficulty>().is_err());
    }
}
