//! Conversion between image files and [`PixelGrid`]s.
//!
//! Decoding and encoding are delegated to the `image` crate, which
//! handles BMP, GIF, JPEG, PNG and PNM. Alpha is discarded on load.
//! Pixel `(x, y)` maps to cell `(row = y, col = x)`.

use crate::grid::{Color, PixelGrid};
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading or writing image files.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The file could not be read or decoded.
    #[error("failed to open {path}: {source}")]
    Open {
        /// File that failed.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },
    /// The file could not be encoded or written.
    #[error("failed to save {path}: {source}")]
    Save {
        /// File that failed.
        path: PathBuf,
        /// Encoder error.
        #[source]
        source: image::ImageError,
    },
    /// A dimension does not fit the encoder's `u32`.
    #[error("{rows}x{cols} grid is too large to encode")]
    TooLarge {
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },
}

/// Decodes the image at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<PixelGrid, CodecError> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|source| CodecError::Open {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgb8();
    let grid = from_rgb_image(&img);
    tracing::info!(
        path = %path.display(),
        rows = grid.rows(),
        cols = grid.cols(),
        "image loaded"
    );
    Ok(grid)
}

/// Encodes `grid` to `path`, choosing the format from the extension.
pub fn save(grid: &PixelGrid, path: impl AsRef<Path>) -> Result<(), CodecError> {
    let path = path.as_ref();
    to_rgb_image(grid)?
        .save(path)
        .map_err(|source| CodecError::Save {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(path = %path.display(), "image saved");
    Ok(())
}

/// Converts a decoded RGB buffer into a grid.
pub fn from_rgb_image(img: &RgbImage) -> PixelGrid {
    let (width, height) = img.dimensions();
    PixelGrid::map_coords(height as usize, width as usize, |row, col| {
        let Rgb([r, g, b]) = *img.get_pixel(col as u32, row as u32);
        Color::from_rgb(r, g, b)
    })
}

/// Converts a grid into an RGB buffer ready for encoding.
pub fn to_rgb_image(grid: &PixelGrid) -> Result<RgbImage, CodecError> {
    let too_large = || CodecError::TooLarge {
        rows: grid.rows(),
        cols: grid.cols(),
    };
    let width = u32::try_from(grid.cols()).map_err(|_| too_large())?;
    let height = u32::try_from(grid.rows()).map_err(|_| too_large())?;

    let raw: Vec<u8> = grid.cells().iter().flat_map(|c| c.channels()).collect();
    RgbImage::from_raw(width, height, raw).ok_or_else(too_large)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{BLACK, GREEN, WHITE};

    #[test]
    fn test_in_memory_conversion_keeps_orientation() {
        let grid = PixelGrid::from_rows(vec![
            vec![BLACK, WHITE, GREEN],
            vec![WHITE, GREEN, BLACK],
        ])
        .unwrap();

        let img = to_rgb_image(&grid).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(*img.get_pixel(2, 0), Rgb([0, 255, 0]));
        assert_eq!(from_rgb_image(&img), grid);
    }

    #[test]
    fn test_png_file_round_trip() {
        let grid = PixelGrid::from_rows(vec![
            vec![Color::from_packed(0x123456), WHITE],
            vec![BLACK, Color::from_packed(0xABCDEF)],
        ])
        .unwrap();

        let path = std::env::temp_dir().join(format!("fauxtoshop-codec-{}.png", std::process::id()));
        save(&grid, &path).unwrap();
        let loaded = load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, grid);
    }

    #[test]
    fn test_missing_file() {
        let result = load("definitely/not/here.png");
        assert!(matches!(result, Err(CodecError::Open { .. })));
    }
}
