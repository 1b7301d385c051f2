//! Separable Gaussian blur.

use super::{check_radius, FilterError};
use crate::grid::{Color, PixelGrid};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Blur configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurParams {
    /// Kernel half-width, between 1 and [`MAX_RADIUS`](super::MAX_RADIUS).
    pub radius: u32,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self { radius: 2 }
    }
}

impl BlurParams {
    /// Rejects a radius outside `1..=MAX_RADIUS`.
    pub fn validate(&self) -> Result<(), FilterError> {
        check_radius("blur radius", self.radius)
    }
}

/// Builds a normalized 1-D Gaussian kernel of length `2 * radius + 1`.
///
/// Returns an empty kernel for `radius == 0`.
pub fn gauss_kernel(radius: u32) -> Vec<f64> {
    if radius < 1 {
        return Vec::new();
    }
    let r = f64::from(radius);
    let magic1 = 1.0 / (2.0 * r * r);
    let magic2 = 1.0 / ((2.0 * PI).sqrt() * r);

    let mut kernel: Vec<f64> = (-(radius as i64)..=radius as i64)
        .map(|offset| {
            let x = (offset * offset) as f64;
            magic2 * (-x * magic1).exp()
        })
        .collect();

    let sum: f64 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// Gaussian blur applied as a horizontal then a vertical pass.
///
/// Samples past the border repeat the nearest edge pixel.
#[derive(Debug, Clone)]
pub struct GaussianBlur {
    kernel: Vec<f64>,
    radius: usize,
}

impl GaussianBlur {
    /// Builds the kernel for a validated radius.
    pub fn new(params: BlurParams) -> Result<Self, FilterError> {
        params.validate()?;
        Ok(Self {
            kernel: gauss_kernel(params.radius),
            radius: params.radius as usize,
        })
    }

    /// Normalized kernel weights.
    pub fn kernel(&self) -> &[f64] {
        &self.kernel
    }

    /// Blurs `grid` into a new grid of the same size.
    pub fn apply(&self, grid: &PixelGrid) -> PixelGrid {
        let (rows, cols) = grid.dimensions();
        if grid.is_empty() {
            return grid.clone();
        }

        // Horizontal pass into unrounded per-channel planes.
        let mut horizontal = vec![[0.0f64; 3]; rows * cols];
        for row in 0..rows {
            let line = grid.row(row);
            for col in 0..cols {
                let mut acc = [0.0f64; 3];
                for (k, weight) in self.kernel.iter().enumerate() {
                    let src = clamp_index(col as i64 + k as i64 - self.radius as i64, cols);
                    for (channel, value) in line[src].channels().iter().enumerate() {
                        acc[channel] += weight * f64::from(*value);
                    }
                }
                horizontal[row * cols + col] = acc;
            }
        }

        let result = PixelGrid::map_coords(rows, cols, |row, col| {
            let mut acc = [0.0f64; 3];
            for (k, weight) in self.kernel.iter().enumerate() {
                let src = clamp_index(row as i64 + k as i64 - self.radius as i64, rows);
                let sample = horizontal[src * cols + col];
                for channel in 0..3 {
                    acc[channel] += weight * sample[channel];
                }
            }
            Color::from_rgb(to_channel(acc[0]), to_channel(acc[1]), to_channel(acc[2]))
        });

        tracing::debug!(rows, cols, radius = self.radius, "blur applied");
        result
    }
}

#[inline]
fn clamp_index(index: i64, len: usize) -> usize {
    index.clamp(0, len as i64 - 1) as usize
}

#[inline]
fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Blurs `grid` with a Gaussian of the given radius.
pub fn blur(grid: &PixelGrid, radius: u32) -> Result<PixelGrid, FilterError> {
    Ok(GaussianBlur::new(BlurParams { radius })?.apply(grid))
}
