//! Occupancy summaries for diagnostics.
//!
//! A cheap aggregate over a freshly built grid: how many cells are in use and
//! how crowded the busiest one is. Used for overlays and trace logging.

use serde::{Deserialize, Serialize};

use crate::grid::UniformGrid;

/// Summary of how keys are spread over a [`UniformGrid`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OccupancyStats {
    /// Cells with at least one member
    pub occupied_cells: usize,
    /// Sum of member counts over all cells (a key spanning cells counts once per cell)
    pub total_memberships: usize,
    /// Largest member count of any cell
    pub max_members: usize,
    /// Mean member count over occupied cells
    pub mean_members: f64,
}

impl OccupancyStats {
    /// Computes occupancy statistics for a grid.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_grid<K: Ord + Copy>(grid: &UniformGrid<K>) -> Self {
        let mut stats = Self::default();
        for cell in grid.cells().filter(|c| !c.is_empty()) {
            stats.occupied_cells += 1;
            stats.total_memberships += cell.len();
            stats.max_members = stats.max_members.max(cell.len());
        }
        if stats.occupied_cells > 0 {
            stats.mean_members = stats.total_memberships as f64 / stats.occupied_cells as f64;
        }
        stats
    }

    /// Number of candidate pairs a full within-cell sweep would test.
    #[must_use]
    pub fn candidate_pairs<K: Ord + Copy>(grid: &UniformGrid<K>) -> usize {
        grid.cells()
            .map(|c| c.len() * c.len().saturating_sub(1) / 2)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use std::num::NonZeroU32;

    fn grid() -> UniformGrid<u32> {
        UniformGrid::new(100, 50, NonZeroU32::new(25).unwrap())
    }

    #[test]
    fn empty_grid_has_zero_stats() {
        let stats = OccupancyStats::from_grid(&grid());
        assert_eq!(stats, OccupancyStats::default());
    }

    #[test]
    fn stats_count_memberships_per_cell() {
        let mut grid = grid();
        grid.insert(1, DVec2::new(1.0, 1.0));
        grid.insert(2, DVec2::new(2.0, 2.0));
        grid.insert(3, DVec2::new(2.0, 2.0));
        grid.insert(3, DVec2::new(60.0, 30.0));

        let stats = OccupancyStats::from_grid(&grid);
        assert_eq!(stats.occupied_cells, 2);
        assert_eq!(stats.total_memberships, 4);
        assert_eq!(stats.max_members, 3);
        assert!((stats.mean_members - 2.0).abs() < 0.0001);
    }

    #[test]
    fn candidate_pairs_sums_cell_combinations() {
        let mut grid = grid();
        for key in 0..4 {
            grid.insert(key, DVec2::new(5.0, 5.0));
        }
        grid.insert(9, DVec2::new(80.0, 40.0));
        assert_eq!(OccupancyStats::candidate_pairs(&grid), 6);
    }
}
