//! Edge detection by local color variation.

use crate::grid::{difference, PixelGrid, BLACK, WHITE};
use serde::{Deserialize, Serialize};

/// Edge detector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    /// A neighbor further than this from the center marks an edge.
    pub threshold: u32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self { threshold: 50 }
    }
}

/// Marks each cell BLACK if any cell in its 3x3 neighborhood differs from
/// it by more than the threshold, WHITE otherwise.
///
/// The neighborhood is clipped at the grid boundary. It includes the
/// center itself, which always compares as zero and never fires.
#[derive(Debug, Clone, Copy)]
pub struct EdgeDetector {
    threshold: u32,
}

impl EdgeDetector {
    /// Creates a detector. Any threshold is valid.
    pub fn new(params: EdgeParams) -> Self {
        Self {
            threshold: params.threshold,
        }
    }

    /// Largest neighbor distance that is not an edge.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Returns true if `(row, col)` lies on an edge.
    pub fn is_edge(&self, grid: &PixelGrid, row: usize, col: usize) -> bool {
        let Some(center) = grid.get(row, col) else {
            return false;
        };
        let (row, col) = (row as i64, col as i64);
        for r in row - 1..=row + 1 {
            for c in col - 1..=col + 1 {
                if let Some(other) = grid.get_signed(r, c) {
                    if difference(center, other) > self.threshold {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Maps every cell to BLACK on an edge and WHITE elsewhere.
    pub fn apply(&self, grid: &PixelGrid) -> PixelGrid {
        let mut edges = 0usize;
        let result = PixelGrid::map_coords(grid.rows(), grid.cols(), |row, col| {
            if self.is_edge(grid, row, col) {
                edges += 1;
                BLACK
            } else {
                WHITE
            }
        });

        tracing::debug!(
            rows = grid.rows(),
            cols = grid.cols(),
            threshold = self.threshold,
            edges,
            "edge detection applied"
        );
        result
    }
}

/// Runs edge detection on `grid` at the given threshold.
pub fn detect_edges(grid: &PixelGrid, threshold: u32) -> PixelGrid {
    EdgeDetector::new(EdgeParams { threshold }).apply(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Color;

    #[test]
    fn test_uniform_grid_has_no_edges() {
        let grid = PixelGrid::fill(3, 3, WHITE);
        let out = detect_edges(&grid, 10);
        assert_eq!(out, PixelGrid::fill(3, 3, WHITE));
    }

    #[test]
    fn test_single_black_corner_marks_all() {
        let grid = PixelGrid::from_rows(vec![vec![BLACK, WHITE], vec![WHITE, WHITE]]).unwrap();
        let out = detect_edges(&grid, 50);
        assert_eq!(out, PixelGrid::fill(2, 2, BLACK));
    }

    #[test]
    fn test_threshold_is_strict() {
        let a = Color::from_rgb(100, 100, 100);
        let b = Color::from_rgb(120, 100, 100);
        let grid = PixelGrid::from_rows(vec![vec![a, b]]).unwrap();

        // difference is exactly 20
        assert_eq!(detect_edges(&grid, 20), PixelGrid::fill(1, 2, WHITE));
        assert_eq!(detect_edges(&grid, 19), PixelGrid::fill(1, 2, BLACK));
    }

    #[test]
    fn test_neighborhood_is_clipped_not_wrapped() {
        // Column 0 and column 4 differ, but they are not neighbors.
        let row = vec![BLACK, WHITE, WHITE, WHITE, BLACK];
        let grid = PixelGrid::from_rows(vec![row]).unwrap();
        let out = detect_edges(&grid, 10);
        assert_eq!(out.row(0), &[BLACK, BLACK, WHITE, BLACK, BLACK]);
    }

    #[test]
    fn test_center_self_comparison_has_no_effect() {
        // A 1x1 grid has only the center in its neighborhood. Even at
        // threshold 0 the self-comparison must never mark an edge.
        let detector = EdgeDetector::new(EdgeParams { threshold: 0 });
        for packed in [0x000000, 0x123456, 0xFFFFFF] {
            let grid = PixelGrid::fill(1, 1, Color::from_packed(packed));
            assert!(!detector.is_edge(&grid, 0, 0));
        }
    }

    #[test]
    fn test_diagonal_neighbor_counts() {
        let grid = PixelGrid::from_rows(vec![
            vec![WHITE, WHITE, WHITE],
            vec![WHITE, WHITE, WHITE],
            vec![WHITE, WHITE, BLACK],
        ])
        .unwrap();
        let detector = EdgeDetector::new(EdgeParams::default());
        assert!(detector.is_edge(&grid, 1, 1));
        assert!(!detector.is_edge(&grid, 0, 0));
    }
}
