//! Uniform grid of key buckets.
//!
//! The grid is anchored at the origin and tiles `width × height` with square
//! cells. It is meant to be cleared and refilled every step: cells own no
//! objects, only the keys the caller inserted since the last [`UniformGrid::clear`].

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::Bounds;

// =============================================================================
// Cell
// =============================================================================

/// A single grid cell and the keys that touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell<K: Ord> {
    col: usize,
    row: usize,
    members: BTreeSet<K>,
}

impl<K: Ord + Copy> Cell<K> {
    fn new(col: usize, row: usize) -> Self {
        Self {
            col,
            row,
            members: BTreeSet::new(),
        }
    }

    /// Column index of this cell.
    #[must_use]
    pub const fn col(&self) -> usize {
        self.col
    }

    /// Row index of this cell.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Number of distinct keys in this cell.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if no key touches this cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns true if `key` is a member of this cell.
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.members.contains(&key)
    }

    /// Iterates members in ascending key order.
    pub fn members(&self) -> impl Iterator<Item = K> + '_ {
        self.members.iter().copied()
    }

    /// Iterates every unordered pair of distinct members `(a, b)` with `a < b`.
    pub fn pairs(&self) -> impl Iterator<Item = (K, K)> + '_ {
        self.members.iter().enumerate().flat_map(move |(i, &a)| {
            self.members.iter().skip(i + 1).map(move |&b| (a, b))
        })
    }
}

// =============================================================================
// UniformGrid
// =============================================================================

/// Fixed-size 2D grid of [`Cell`]s covering `[0, width] × [0, height]`.
///
/// Dimensions are `extent / cell_size + 1` per axis, plus one more when the
/// extent is not a multiple of the cell size, so a point on the far edge
/// always has a cell of its own.
///
/// # Example
///
/// ```
/// use std::num::NonZeroU32;
/// use tessera::UniformGrid;
///
/// let grid: UniformGrid<u32> = UniformGrid::new(100, 50, NonZeroU32::new(25).unwrap());
/// assert_eq!((grid.cols(), grid.rows()), (5, 3));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniformGrid<K: Ord> {
    width: u32,
    height: u32,
    cell_size: NonZeroU32,
    cols: usize,
    rows: usize,
    /// Row-major cell storage.
    cells: Vec<Cell<K>>,
}

impl<K: Ord + Copy> UniformGrid<K> {
    /// Creates an empty grid covering `width × height`.
    #[must_use]
    pub fn new(width: u32, height: u32, cell_size: NonZeroU32) -> Self {
        let cols = Self::axis_cells(width, cell_size);
        let rows = Self::axis_cells(height, cell_size);
        let cells = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Cell::new(col, row)))
            .collect();

        Self {
            width,
            height,
            cell_size,
            cols,
            rows,
            cells,
        }
    }

    fn axis_cells(extent: u32, cell_size: NonZeroU32) -> usize {
        let step = cell_size.get();
        let extra = if extent % step > 0 { 2 } else { 1 };
        (extent / step + extra) as usize
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Edge length of a cell.
    #[must_use]
    pub const fn cell_size(&self) -> NonZeroU32 {
        self.cell_size
    }

    /// The extent this grid was built for.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(f64::from(self.width), f64::from(self.height))
    }

    /// Maps a point to its `(col, row)` cell.
    ///
    /// Coordinates are truncated toward zero and then clamped to the grid, so
    /// points slightly outside the extent land in the nearest edge cell.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cell_of(&self, point: DVec2) -> (usize, usize) {
        let size = f64::from(self.cell_size.get());
        let to_index = |coord: f64, count: usize| -> usize {
            let raw = (coord / size).trunc();
            if raw.is_nan() || raw <= 0.0 {
                0
            } else {
                (raw as usize).min(count - 1)
            }
        };
        (to_index(point.x, self.cols), to_index(point.y, self.rows))
    }

    /// Removes every key from every cell.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.members.clear();
        }
    }

    /// Inserts `key` into the cell containing `point`.
    ///
    /// Returns false if the key was already a member of that cell.
    pub fn insert(&mut self, key: K, point: DVec2) -> bool {
        let (col, row) = self.cell_of(point);
        let index = row * self.cols + col;
        self.cells[index].members.insert(key)
    }

    /// Inserts `key` into every cell touched by any of `points`.
    pub fn insert_points(&mut self, key: K, points: impl IntoIterator<Item = DVec2>) {
        for point in points {
            self.insert(key, point);
        }
    }

    /// Returns the cell at `(col, row)`, if it exists.
    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell<K>> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// Iterates cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell<K>> + '_ {
        self.cells.iter()
    }

    /// Returns the cells as a slice in row-major order.
    #[must_use]
    pub fn cells_slice(&self) -> &[Cell<K>] {
        &self.cells
    }

    /// Member count of every cell, one inner vector per row.
    #[must_use]
    pub fn occupancy(&self) -> Vec<Vec<usize>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(Cell::len).collect())
            .collect()
    }

    /// Returns true if no cell has any member.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }
}
