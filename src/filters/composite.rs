//! Green-screen compositing.
//!
//! Pastes a sticker grid onto a base grid at an offset. Sticker pixels
//! within `tolerance` of the key color are transparent; the comparison is
//! strict, so a pixel exactly `tolerance` away is still skipped. Sticker
//! cells landing outside the base are dropped.

use crate::grid::{difference, Color, PixelGrid, GREEN};
use serde::{Deserialize, Serialize};

/// Compositing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeParams {
    /// Base row receiving sticker row 0. May be negative.
    pub offset_row: i64,
    /// Base column receiving sticker column 0. May be negative.
    pub offset_col: i64,
    /// Largest key distance still treated as transparent.
    pub tolerance: u32,
    /// Chroma-key color.
    pub key_color: Color,
}

impl Default for CompositeParams {
    fn default() -> Self {
        Self {
            offset_row: 0,
            offset_col: 0,
            tolerance: 50,
            key_color: GREEN,
        }
    }
}

impl CompositeParams {
    /// Parameters placing the sticker at `(row, col)` with the default key.
    pub fn at(offset_row: i64, offset_col: i64, tolerance: u32) -> Self {
        Self {
            offset_row,
            offset_col,
            tolerance,
            ..Default::default()
        }
    }

    /// Replaces the chroma-key color.
    pub fn with_key_color(mut self, key_color: Color) -> Self {
        self.key_color = key_color;
        self
    }
}

/// Chroma-key compositor.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    params: CompositeParams,
}

impl Compositor {
    /// Creates a compositor. Any offset and tolerance are valid.
    pub fn new(params: CompositeParams) -> Self {
        Self { params }
    }

    /// Placement and key settings.
    pub fn params(&self) -> &CompositeParams {
        &self.params
    }

    /// True if `pixel` should be treated as see-through.
    #[inline]
    pub fn is_transparent(&self, pixel: Color) -> bool {
        difference(pixel, self.params.key_color) <= self.params.tolerance
    }

    /// Returns a copy of `base` with the opaque part of `sticker` pasted on.
    pub fn apply(&self, base: &PixelGrid, sticker: &PixelGrid) -> PixelGrid {
        let mut result = base.clone();
        let cols = base.cols();
        let mut written = 0usize;

        for (sr, sc, pixel) in sticker.iter() {
            let row = self.params.offset_row + sr as i64;
            let col = self.params.offset_col + sc as i64;
            if !base.in_bounds(row, col) || self.is_transparent(pixel) {
                continue;
            }
            result.cells_mut()[row as usize * cols + col as usize] = pixel;
            written += 1;
        }

        tracing::debug!(
            base_rows = base.rows(),
            base_cols = base.cols(),
            sticker_rows = sticker.rows(),
            sticker_cols = sticker.cols(),
            offset_row = self.params.offset_row,
            offset_col = self.params.offset_col,
            tolerance = self.params.tolerance,
            written,
            "sticker composited"
        );
        result
    }
}

/// Composites `sticker` onto `base`.
pub fn composite(base: &PixelGrid, sticker: &PixelGrid, params: CompositeParams) -> PixelGrid {
    Compositor::new(params).apply(base, sticker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{BLACK, WHITE};

    const RED: Color = Color::from_rgb(0xFF, 0, 0);

    #[test]
    fn test_red_pixel_at_offset() {
        let base = PixelGrid::fill(2, 2, BLACK);
        let sticker = PixelGrid::fill(1, 1, RED);
        let out = composite(&base, &sticker, CompositeParams::at(0, 1, 10));
        let expected = PixelGrid::from_rows(vec![vec![BLACK, RED], vec![BLACK, BLACK]]).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_key_colored_pixels_are_transparent() {
        let base = PixelGrid::fill(2, 2, WHITE);
        let sticker = PixelGrid::from_rows(vec![vec![GREEN, RED], vec![RED, GREEN]]).unwrap();
        let out = composite(&base, &sticker, CompositeParams::at(0, 0, 0));
        let expected = PixelGrid::from_rows(vec![vec![WHITE, RED], vec![RED, WHITE]]).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_tolerance_boundary_is_transparent() {
        let near_green = Color::from_rgb(0, 0xFF - 30, 0);
        let base = PixelGrid::fill(1, 1, WHITE);
        let sticker = PixelGrid::fill(1, 1, near_green);

        let at_boundary = composite(&base, &sticker, CompositeParams::at(0, 0, 30));
        assert_eq!(at_boundary, base);

        let below = composite(&base, &sticker, CompositeParams::at(0, 0, 29));
        assert_eq!(below.get(0, 0), Some(near_green));
    }

    #[test]
    fn test_out_of_bounds_cells_dropped() {
        let base = PixelGrid::fill(2, 2, BLACK);
        let sticker = PixelGrid::fill(2, 2, RED);

        let out = composite(&base, &sticker, CompositeParams::at(-1, -1, 0));
        let expected = PixelGrid::from_rows(vec![vec![RED, BLACK], vec![BLACK, BLACK]]).unwrap();
        assert_eq!(out, expected);

        let off_grid = composite(&base, &sticker, CompositeParams::at(5, 5, 0));
        assert_eq!(off_grid, base);
    }

    #[test]
    fn test_custom_key_color() {
        let base = PixelGrid::fill(1, 2, BLACK);
        let sticker = PixelGrid::from_rows(vec![vec![RED, GREEN]]).unwrap();
        let params = CompositeParams::at(0, 0, 0).with_key_color(RED);
        let out = composite(&base, &sticker, params);
        assert_eq!(out.row(0), &[BLACK, GREEN]);
    }

    #[test]
    fn test_base_untouched() {
        let base = PixelGrid::fill(3, 3, BLACK);
        let copy = base.clone();
        let _ = composite(&base, &PixelGrid::fill(2, 2, RED), CompositeParams::at(1, 1, 0));
        assert_eq!(base, copy);
    }
}
