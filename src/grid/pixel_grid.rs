//! Row-major grid of packed colors.

use super::Color;
use thiserror::Error;

/// Errors raised when building or writing into a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The cell buffer length is not `rows * cols`.
    #[error("cell buffer holds {actual} values, expected {expected}")]
    SizeMismatch {
        /// `rows * cols`.
        expected: usize,
        /// Buffer length supplied.
        actual: usize,
    },
    /// A write targeted a cell outside the grid.
    #[error("({row}, {col}) is outside a {rows}x{cols} grid")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },
    /// A row passed to `from_rows` differs in length from the first.
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Length of row 0.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },
}

/// A 2D image raster: one packed RGB color per cell.
///
/// Filters treat grids as immutable input and always return a freshly
/// allocated result.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Color>,
}

impl PixelGrid {
    /// Wraps a row-major cell buffer, checking its length.
    pub fn new(rows: usize, cols: usize, cells: Vec<Color>) -> Result<Self, GridError> {
        let expected = rows * cols;
        if cells.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Creates a grid with every cell set to `color`.
    pub fn fill(rows: usize, cols: usize, color: Color) -> Self {
        Self {
            rows,
            cols,
            cells: vec![color; rows * cols],
        }
    }

    /// Builds a grid from nested rows. All rows must be the same length.
    pub fn from_rows(rows: Vec<Vec<Color>>) -> Result<Self, GridError> {
        let cols = rows.first().map_or(0, Vec::len);
        let row_count = rows.len();
        let mut cells = Vec::with_capacity(row_count * cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != cols {
                return Err(GridError::RaggedRows {
                    row,
                    expected: cols,
                    actual: values.len(),
                });
            }
            cells.extend(values);
        }
        Ok(Self {
            rows: row_count,
            cols,
            cells,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if the signed coordinate lies inside the grid.
    ///
    /// Filters probe candidate coordinates that may be negative or past the
    /// edge, so this takes `i64` rather than `usize`.
    #[inline]
    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as u64) < self.rows as u64 && (col as u64) < self.cols as u64
    }

    /// Returns the cell at `(row, col)`, or `None` if outside the grid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Signed lookup, `None` for any coordinate off the grid.
    #[inline]
    pub fn get_signed(&self, row: i64, col: i64) -> Option<Color> {
        if self.in_bounds(row, col) {
            Some(self.cells[row as usize * self.cols + col as usize])
        } else {
            None
        }
    }

    /// Overwrites one cell.
    pub fn set(&mut self, row: usize, col: usize, color: Color) -> Result<(), GridError> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.cells[row * self.cols + col] = color;
        Ok(())
    }

    /// Borrows one row. Panics if `row >= rows`.
    #[inline]
    pub fn row(&self, row: usize) -> &[Color] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Row-major view of every cell.
    #[inline]
    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    /// Iterates `(row, col, color)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Color)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &color)| (i / cols, i % cols, color))
    }

    /// Builds a same-sized grid by evaluating `f` at every coordinate in
    /// row-major order.
    pub(crate) fn map_coords<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Color,
    {
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(row, col));
            }
        }
        Self { rows, cols, cells }
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Color] {
        &mut self.cells
    }

    /// Consumes the grid, returning the row-major buffer.
    pub fn into_cells(self) -> Vec<Color> {
        self.cells
    }
}

impl std::fmt::Debug for PixelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cells.len() <= 64 {
            let rows: Vec<&[Color]> = (0..self.rows).map(|r| self.row(r)).collect();
            f.debug_struct("PixelGrid")
                .field("rows", &self.rows)
                .field("cols", &self.cols)
                .field("cells", &rows)
                .finish()
        } else {
            f.debug_struct("PixelGrid")
                .field("rows", &self.rows)
                .field("cols", &self.cols)
                .field("cells", &self.cells.len())
                .finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{BLACK, WHITE};

    #[test]
    fn test_grid_creation() {
        let grid = PixelGrid::new(2, 3, vec![BLACK; 6]).unwrap();
        assert_eq!(grid.dimensions(), (2, 3));
        assert_eq!(grid.len(), 6);
        assert_eq!(grid.get(1, 2), Some(BLACK));
    }

    #[test]
    fn test_grid_invalid_size() {
        let result = PixelGrid::new(2, 3, vec![BLACK; 5]);
        assert_eq!(
            result,
            Err(GridError::SizeMismatch {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = PixelGrid::from_rows(vec![vec![BLACK, WHITE], vec![BLACK]]);
        assert!(matches!(result, Err(GridError::RaggedRows { row: 1, .. })));
    }

    #[test]
    fn test_bounds_checks() {
        let mut grid = PixelGrid::fill(2, 2, WHITE);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(1, 1));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(0, 2));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get_signed(0, -1), None);
        assert!(matches!(
            grid.set(0, 5, BLACK),
            Err(GridError::OutOfBounds { row: 0, col: 5, .. })
        ));

        grid.set(1, 0, BLACK).unwrap();
        assert_eq!(grid.row(1), &[BLACK, WHITE]);
    }

    #[test]
    fn test_iter_is_row_major() {
        let grid = PixelGrid::from_rows(vec![vec![BLACK, WHITE], vec![WHITE, BLACK]]).unwrap();
        let coords: Vec<(usize, usize)> = grid.iter().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }
}
