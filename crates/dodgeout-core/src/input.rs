//! Directional input resolution.
//!
//! The host delivers whatever directional keys were seen during a frame.
//! [`resolve_direction`] folds them into one [`Direction`] that the player
//! then moves along.

use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_SPEED_INCREMENT;

/// A resolved movement direction. `+y` points down the screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Toward `-y`.
    Up,
    /// Toward `+y`.
    Down,
    /// Toward `-x`.
    Left,
    /// Toward `+x`.
    Right,
    /// Up and left.
    UpLeft,
    /// Up and right.
    UpRight,
    /// Down and left.
    DownLeft,
    /// Down and right.
    DownRight,
    /// No movement.
    #[default]
    Unassigned,
}

impl Direction {
    /// Unit components `(x, y)`, each in `{-1, 0, 1}`.
    #[must_use]
    pub const fn components(self) -> (i8, i8) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::UpLeft => (-1, -1),
            Self::UpRight => (1, -1),
            Self::DownLeft => (-1, 1),
            Self::DownRight => (1, 1),
            Self::Unassigned => (0, 0),
        }
    }

    /// Direction with the given unit components.
    #[must_use]
    pub const fn from_components(x: i8, y: i8) -> Self {
        match (x.signum(), y.signum()) {
            (0, -1) => Self::Up,
            (0, 1) => Self::Down,
            (-1, 0) => Self::Left,
            (1, 0) => Self::Right,
            (-1, -1) => Self::UpLeft,
            (1, -1) => Self::UpRight,
            (-1, 1) => Self::DownLeft,
            (1, 1) => Self::DownRight,
            _ => Self::Unassigned,
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        let (x, y) = self.components();
        Self::from_components(-x, -y)
    }

    /// Returns true for the four diagonals.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        let (x, y) = self.components();
        x != 0 && y != 0
    }

    /// Folds one more input into the current resolution.
    ///
    /// Per axis: an opposing component cancels to zero, a new non-zero
    /// component replaces the current one, and a zero input component leaves
    /// the axis unchanged.
    #[must_use]
    pub const fn combine(self, input: Self) -> Self {
        const fn axis(current: i8, input: i8) -> i8 {
            if current != 0 && current == -input {
                0
            } else if input != 0 {
                input
            } else {
                current
            }
        }
        let (cx, cy) = self.components();
        let (ix, iy) = input.components();
        Self::from_components(axis(cx, ix), axis(cy, iy))
    }

    /// Velocity increment applied to the player's input channel.
    ///
    /// Axis directions add the full per-axis increment; diagonals scale
    /// each axis by `1/√2`.
    #[must_use]
    pub fn increment(self) -> DVec2 {
        let (x, y) = self.components();
        let scale = if self.is_diagonal() { FRAC_1_SQRT_2 } else { 1.0 };
        DVec2::new(f64::from(x), f64::from(y)) * PLAYER_SPEED_INCREMENT * scale
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::UpLeft => "UpLeft",
            Self::UpRight => "UpRight",
            Self::DownLeft => "DownLeft",
            Self::DownRight => "DownRight",
            Self::Unassigned => "Unassigned",
        };
        write!(f, "{name}")
    }
}

/// Folds a frame's inputs, in arrival order, into a single direction.
///
/// # Example
///
/// ```
/// use dodgeout_core::input::{resolve_direction, Direction};
///
/// assert_eq!(resolve_direction(&[Direction::Up, Direction::Left]), Direction::UpLeft);
/// assert_eq!(resolve_direction(&[Direction::Up, Direction::Down]), Direction::Unassigned);
/// assert_eq!(resolve_direction(&[]), Direction::Unassigned);
/// ```
#[must_use]
pub fn resolve_direction(inputs: &[Direction]) -> Direction {
    inputs
        .iter()
        .fold(Direction::Unassigned, |current, &input| current.combine(input))
}
