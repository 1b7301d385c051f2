//! Pixel-exact image comparison.
//!
//! Two grids are compared cell by cell using packed-color equality. Grids
//! of different sizes are an error; a prefix is never compared.

mod report;

pub use report::DiffReport;

use crate::grid::PixelGrid;
use thiserror::Error;

/// Errors that can occur while comparing grids.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// The two grids have different dimensions.
    #[error("cannot compare a {}x{} image with a {}x{} image", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch {
        /// `(rows, cols)` of the first grid.
        left: (usize, usize),
        /// `(rows, cols)` of the second grid.
        right: (usize, usize),
    },
}

/// Compares `a` and `b`, returning every position where they differ.
pub fn diff(a: &PixelGrid, b: &PixelGrid) -> Result<DiffReport, DiffError> {
    if a.dimensions() != b.dimensions() {
        return Err(DiffError::DimensionMismatch {
            left: a.dimensions(),
            right: b.dimensions(),
        });
    }

    let positions: Vec<(usize, usize)> = a
        .iter()
        .zip(b.cells())
        .filter(|((_, _, left), right)| left != *right)
        .map(|((row, col, _), _)| (row, col))
        .collect();

    tracing::debug!(
        rows = a.rows(),
        cols = a.cols(),
        differing = positions.len(),
        "grids compared"
    );

    Ok(DiffReport::new(a.rows(), a.cols(), positions))
}
