//! Scatter: stochastic resampling within a square window.
//!
//! Each output cell copies the color of a randomly chosen input cell whose
//! row and column are each within `radius` of its own. Candidates that fall
//! off the grid are redrawn, never clamped or reflected, so cells near the
//! border sample more heavily from the interior side.

use super::{check_radius, FilterError};
use crate::grid::PixelGrid;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

/// Scatter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterParams {
    /// Half-width of the sampling window, between 1 and
    /// [`MAX_RADIUS`](super::MAX_RADIUS).
    pub radius: u32,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self { radius: 5 }
    }
}

impl ScatterParams {
    /// Rejects a radius outside `1..=MAX_RADIUS`.
    pub fn validate(&self) -> Result<(), FilterError> {
        check_radius("scatter radius", self.radius)
    }
}

/// Scatter filter with a validated radius.
#[derive(Debug, Clone, Copy)]
pub struct ScatterFilter {
    radius: i64,
}

impl ScatterFilter {
    /// Builds a filter from validated parameters.
    pub fn new(params: ScatterParams) -> Result<Self, FilterError> {
        params.validate()?;
        Ok(Self {
            radius: i64::from(params.radius),
        })
    }

    /// Convenience constructor taking the radius directly.
    pub fn with_radius(radius: u32) -> Result<Self, FilterError> {
        Self::new(ScatterParams { radius })
    }

    /// Window half-width.
    pub fn radius(&self) -> u32 {
        self.radius as u32
    }

    /// Scatters `grid`, drawing from `rng`.
    ///
    /// Cells are visited row-major and each attempt draws the row before
    /// the column, so a seeded source reproduces the same output.
    pub fn apply<R: RandomSource + ?Sized>(&self, grid: &PixelGrid, rng: &mut R) -> PixelGrid {
        let mut attempts: u64 = 0;
        let result = PixelGrid::map_coords(grid.rows(), grid.cols(), |row, col| {
            let (row, col) = (row as i64, col as i64);
            // Terminates: the window always contains (row, col) itself.
            loop {
                attempts += 1;
                let r = rng.random_integer(row - self.radius, row + self.radius);
                let c = rng.random_integer(col - self.radius, col + self.radius);
                if let Some(color) = grid.get_signed(r, c) {
                    break color;
                }
            }
        });

        tracing::debug!(
            rows = grid.rows(),
            cols = grid.cols(),
            radius = self.radius,
            attempts,
            rejected = attempts - grid.len() as u64,
            "scatter applied"
        );
        result
    }
}

/// Scatters `grid` with the given radius.
pub fn scatter<R: RandomSource + ?Sized>(
    grid: &PixelGrid,
    radius: u32,
    rng: &mut R,
) -> Result<PixelGrid, FilterError> {
    Ok(ScatterFilter::with_radius(radius)?.apply(grid, rng))
}
