//! Pixel model shared by every filter.
//!
//! A [`PixelGrid`] is a row-major raster of packed [`Color`] values.
//! Colors are plain `Copy` values; the module-level constants are the
//! only named colors the filters rely on.

mod color;
mod pixel_grid;

pub use color::{difference, Color, ParseColorError, BLACK, GREEN, MAGENTA, WHITE};
pub use pixel_grid::{GridError, PixelGrid};
