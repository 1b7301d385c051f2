//! Diff result type.

use super::DiffError;
use crate::grid::{PixelGrid, MAGENTA};

/// Positions where two equal-sized grids disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    rows: usize,
    cols: usize,
    /// Differing `(row, col)` coordinates, row-major.
    positions: Vec<(usize, usize)>,
}

impl DiffReport {
    pub(crate) fn new(rows: usize, cols: usize, positions: Vec<(usize, usize)>) -> Self {
        Self {
            rows,
            cols,
            positions,
        }
    }

    /// Number of differing cells.
    #[inline]
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// True if the grids were identical.
    #[inline]
    pub fn is_identical(&self) -> bool {
        self.positions.is_empty()
    }

    /// Differing `(row, col)` coordinates, row-major.
    #[inline]
    pub fn positions(&self) -> &[(usize, usize)] {
        &self.positions
    }

    /// Dimensions of the compared grids.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Fraction of cells that differ, in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        let total = self.rows * self.cols;
        if total == 0 {
            return 0.0;
        }
        self.count() as f64 / total as f64
    }

    /// Returns a copy of `background` with every differing cell painted
    /// magenta.
    ///
    /// `background` is normally one of the two compared grids and must have
    /// their dimensions.
    pub fn highlight(&self, background: &PixelGrid) -> Result<PixelGrid, DiffError> {
        if background.dimensions() != self.dimensions() {
            return Err(DiffError::DimensionMismatch {
                left: background.dimensions(),
                right: self.dimensions(),
            });
        }
        let mut out = background.clone();
        let cells = out.cells_mut();
        for &(row, col) in &self.positions {
            cells[row * self.cols + col] = MAGENTA;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BLACK;

    #[test]
    fn test_ratio() {
        let report = DiffReport::new(2, 2, vec![(0, 0)]);
        assert_eq!(report.count(), 1);
        assert!((report.ratio() - 0.25).abs() < f64::EPSILON);
        assert!(!report.is_identical());
    }

    #[test]
    fn test_empty_grid_ratio() {
        let report = DiffReport::new(0, 0, Vec::new());
        assert_eq!(report.ratio(), 0.0);
        assert!(report.is_identical());
    }

    #[test]
    fn test_highlight_paints_magenta() {
        let report = DiffReport::new(2, 2, vec![(0, 1), (1, 0)]);
        let out = report.highlight(&PixelGrid::fill(2, 2, BLACK)).unwrap();
        let expected =
            PixelGrid::from_rows(vec![vec![BLACK, MAGENTA], vec![MAGENTA, BLACK]]).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_highlight_rejects_other_sizes() {
        let report = DiffReport::new(2, 2, vec![(1, 1)]);
        assert_eq!(
            report.highlight(&PixelGrid::fill(1, 1, BLACK)),
            Err(DiffError::DimensionMismatch {
                left: (1, 1),
                right: (2, 2),
            })
        );
        assert!(report.highlight(&PixelGrid::fill(3, 2, BLACK)).is_err());
    }
}
