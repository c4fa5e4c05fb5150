//! # Tessera
//!
//! Uniform grid spatial substrate for broad-phase collision bucketing.
//!
//! Tessera tiles a rectangular extent into fixed-size square cells. Callers
//! rebuild the grid from scratch whenever their objects move, inserting each
//! object's key at every sample point it covers (typically the corners of its
//! bounding rectangle). Each cell then lists the keys that touch it, so
//! narrow-phase tests only need to compare keys that share a cell.
//!
//! - **Unique membership**: a key appears at most once per cell
//! - **Deterministic order**: cells iterate row-major, members iterate sorted
//! - **No ownership**: cells hold copyable keys, never the objects themselves
//!
//! ## Quick Start
//!
//! ```
//! use std::num::NonZeroU32;
//! use glam::DVec2;
//! use tessera::UniformGrid;
//!
//! let cell = NonZeroU32::new(25).unwrap();
//! let mut grid: UniformGrid<u64> = UniformGrid::new(100, 50, cell);
//!
//! grid.insert_points(7, [DVec2::new(24.0, 10.0), DVec2::new(26.0, 10.0)]);
//!
//! assert_eq!(grid.cell(0, 0).map(|c| c.len()), Some(1));
//! assert_eq!(grid.cell(1, 0).map(|c| c.len()), Some(1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod grid;
pub mod stats;

// Re-exports for convenience
pub use grid::{Cell, UniformGrid};
pub use stats::OccupancyStats;

use glam::DVec2;

/// Axis-aligned bounding box in two dimensions.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: DVec2,
    /// Maximum corner
    pub max: DVec2,
}

impl Bounds {
    /// Create bounds anchored at the origin with the given extent.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            min: DVec2::ZERO,
            max: DVec2::new(width, height),
        }
    }

    /// Create bounds from min/max corners.
    #[must_use]
    pub const fn from_min_max(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Get the center of the bounds.
    #[must_use]
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the bounds.
    #[must_use]
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    /// Check if a point is inside the bounds (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Clamp a point onto the bounds.
    #[must_use]
    pub fn clamp(&self, point: DVec2) -> DVec2 {
        point.clamp(self.min, self.max)
    }
}
