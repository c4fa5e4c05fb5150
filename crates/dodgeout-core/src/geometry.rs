//! Geometry primitives: vectors, arena-bounded positions and axis-aligned rectangles.
//!
//! Vectors are plain [`glam::DVec2`] values. On top of them this module adds:
//! - [`Position`]: a vector that can never leave the arena
//! - [`Rect`]: an axis-aligned rectangle described by its four corners
//!
//! Screen convention: `+y` points down. A rectangle's "top" edge is the one
//! with the larger `y`, matching how hitboxes are built from a centre point.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use tessera::Bounds;

use crate::consts::{MAX_X, MAX_Y};

/// Two-dimensional real vector.
pub type Vector2 = DVec2;

/// The playable area, `[0, MAX_X] × [0, MAX_Y]` inclusive.
pub const ARENA: Bounds = Bounds::new(MAX_X, MAX_Y);

/// Absolute tolerance for [`VectorExt::approx_eq`].
pub const APPROX_EPSILON: f64 = 1e-9;

// =============================================================================
// Vector helpers
// =============================================================================

/// Extra vector operations used by the simulation.
pub trait VectorExt {
    /// Epsilon-tolerant equality.
    fn approx_eq(self, other: Self) -> bool;

    /// Nearest integer screen cell, rounding half away from zero.
    fn rounded(self) -> (i32, i32);
}

impl VectorExt for DVec2 {
    fn approx_eq(self, other: Self) -> bool {
        self.abs_diff_eq(other, APPROX_EPSILON)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn rounded(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, max)
    }
}

fn clamp_to_arena(v: DVec2) -> DVec2 {
    DVec2::new(clamp_axis(v.x, MAX_X), clamp_axis(v.y, MAX_Y))
}

// =============================================================================
// Position
// =============================================================================

/// A point that always lies inside the arena.
///
/// Every constructor and mutation clamps both axes to `[0, MAX_X] × [0, MAX_Y]`,
/// so an out-of-bounds value is never observable.
///
/// # Example
///
/// ```
/// use dodgeout_core::geometry::Position;
/// use glam::DVec2;
///
/// let mut pos = Position::new(95.0, 10.0);
/// pos.translate(DVec2::new(20.0, -30.0));
/// assert_eq!(pos.get(), DVec2::new(100.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "DVec2", into = "DVec2")]
pub struct Position(DVec2);

impl Position {
    /// Creates a position, clamping it into the arena.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self(clamp_to_arena(DVec2::new(x, y)))
    }

    /// Returns the underlying vector.
    #[must_use]
    pub const fn get(self) -> DVec2 {
        self.0
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(self) -> f64 {
        self.0.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(self) -> f64 {
        self.0.y
    }

    /// Moves by `delta`, clamping the result into the arena.
    pub fn translate(&mut self, delta: DVec2) {
        self.0 = clamp_to_arena(self.0 + delta);
    }

    /// Replaces the position, clamping it into the arena.
    pub fn set(&mut self, value: DVec2) {
        self.0 = clamp_to_arena(value);
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Self(clamp_to_arena(v))
    }
}

impl From<Position> for DVec2 {
    fn from(p: Position) -> Self {
        p.0
    }
}

impl std::ops::AddAssign<DVec2> for Position {
    fn add_assign(&mut self, rhs: DVec2) {
        self.translate(rhs);
    }
}

// =============================================================================
// Rect
// =============================================================================

/// Axis-aligned rectangle stored as four corners plus its area.
///
/// [`Rect::new`] and [`Rect::set`] ignore corner sets that are not axis
/// aligned; the previous value (or the empty default) is kept.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    top_left: DVec2,
    top_right: DVec2,
    bottom_left: DVec2,
    bottom_right: DVec2,
    area: f64,
}

impl Rect {
    /// Builds a rectangle from its corners. Misaligned corners yield the empty rect.
    #[must_use]
    pub fn new(top_left: DVec2, top_right: DVec2, bottom_left: DVec2, bottom_right: DVec2) -> Self {
        let mut rect = Self::default();
        rect.set(top_left, top_right, bottom_left, bottom_right);
        rect
    }

    /// Builds a rectangle of `size` centred on `center`.
    #[must_use]
    pub fn from_center(center: DVec2, size: DVec2) -> Self {
        let half = size * 0.5;
        Self::new(
            center + DVec2::new(-half.x, half.y),
            center + DVec2::new(half.x, half.y),
            center + DVec2::new(-half.x, -half.y),
            center + DVec2::new(half.x, -half.y),
        )
    }

    /// Returns true if the corners describe an axis-aligned rectangle.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_axis_aligned(
        top_left: DVec2,
        top_right: DVec2,
        bottom_left: DVec2,
        bottom_right: DVec2,
    ) -> bool {
        top_left.y == top_right.y
            && bottom_left.y == bottom_right.y
            && top_left.x == bottom_left.x
            && top_right.x == bottom_right.x
    }

    /// Replaces the corners. Silently ignored unless they are axis aligned.
    pub fn set(&mut self, top_left: DVec2, top_right: DVec2, bottom_left: DVec2, bottom_right: DVec2) {
        if !Self::is_axis_aligned(top_left, top_right, bottom_left, bottom_right) {
            return;
        }
        self.top_left = top_left;
        self.top_right = top_right;
        self.bottom_left = bottom_left;
        self.bottom_right = bottom_right;
        self.area = (top_right.x - top_left.x) * (top_right.y - bottom_left.y);
    }

    /// Left edge (`x`).
    #[must_use]
    pub const fn left(&self) -> f64 {
        self.top_left.x
    }

    /// Right edge (`x`).
    #[must_use]
    pub const fn right(&self) -> f64 {
        self.top_right.x
    }

    /// Top edge (`y`, the larger one).
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.top_left.y
    }

    /// Bottom edge (`y`, the smaller one).
    #[must_use]
    pub const fn bottom(&self) -> f64 {
        self.bottom_left.y
    }

    /// Precomputed area.
    #[must_use]
    pub const fn area(&self) -> f64 {
        self.area
    }

    /// Corners in `[top_left, top_right, bottom_left, bottom_right]` order.
    #[must_use]
    pub const fn corners(&self) -> [DVec2; 4] {
        [self.top_left, self.top_right, self.bottom_left, self.bottom_right]
    }

    /// Edge-inclusive overlap test on both axes.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() >= other.bottom()
            && self.bottom() <= other.top()
    }

    /// Overlap area divided by this rectangle's area.
    ///
    /// Zero for disjoint rectangles and for a zero-area `self`.
    #[must_use]
    pub fn proportion_intersected(&self, other: &Self) -> f64 {
        if self.area <= 0.0 {
            return 0.0;
        }
        let x_overlap = (self.right().min(other.right()) - self.left().max(other.left())).max(0.0);
        let y_overlap = (self.top().min(other.top()) - self.bottom().max(other.bottom())).max(0.0);
        (x_overlap * y_overlap) / self.area
    }

    /// Returns true if at least one corner lies inside the arena.
    #[must_use]
    pub fn any_corner_in_arena(&self) -> bool {
        self.corners().iter().any(|&c| ARENA.contains(c))
    }

    /// Returns true if the rectangle reaches the arena's top or bottom edge.
    #[must_use]
    pub fn touches_horizontal_edge(&self) -> bool {
        self.bottom() <= ARENA.min.y || self.top() >= ARENA.max.y
    }

    /// Returns true if the rectangle reaches the arena's left or right edge.
    #[must_use]
    pub fn touches_vertical_edge(&self) -> bool {
        self.left() <= ARENA.min.x || self.right() >= ARENA.max.x
    }
}
