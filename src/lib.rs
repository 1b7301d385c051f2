//! Fauxtoshop Image Filter Library
//!
//! Pixel-level filters over an in-memory RGB raster, plus exact image
//! comparison.
//!
//! # Architecture
//!
//! ```text
//! codec::load → PixelGrid → filters::{scatter, detect_edges, composite, blur} → codec::save
//!                   ↓
//!               diff::diff → DiffReport → highlight
//! ```
//!
//! # Design Principles
//!
//! - **Fresh output**: filters never mutate their input grids
//! - **Total operations**: parameters are checked up front; applying a
//!   filter cannot fail
//! - **Reproducible randomness**: scatter draws through a caller-supplied
//!   [`RandomSource`], so a fixed seed gives identical output
//!
//! # Example
//!
//! ```
//! use fauxtoshop::{
//!     diff::diff,
//!     filters::{composite, detect_edges, scatter, CompositeParams},
//!     grid::{Color, PixelGrid, BLACK, WHITE},
//!     random::ChaChaSource,
//! };
//!
//! let grid = PixelGrid::from_rows(vec![vec![BLACK, WHITE], vec![WHITE, WHITE]]).unwrap();
//!
//! let edges = detect_edges(&grid, 50);
//! assert_eq!(edges, PixelGrid::fill(2, 2, BLACK));
//!
//! let mut rng = ChaChaSource::fixed();
//! let scattered = scatter(&grid, 1, &mut rng).unwrap();
//! assert_eq!(scattered.dimensions(), (2, 2));
//!
//! let red = PixelGrid::fill(1, 1, Color::from_rgb(255, 0, 0));
//! let pasted = composite(&PixelGrid::fill(2, 2, BLACK), &red, CompositeParams::at(0, 1, 10));
//!
//! let report = diff(&pasted, &PixelGrid::fill(2, 2, BLACK)).unwrap();
//! assert_eq!(report.positions(), &[(0, 1)]);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod codec;
pub mod config;
pub mod diff;
pub mod filters;
pub mod grid;
pub mod location;
pub mod metrics;
pub mod random;

// Re-export commonly used types at crate root
pub use config::FileConfig;
pub use diff::{DiffError, DiffReport};
pub use filters::{Compositor, EdgeDetector, FilterError, GaussianBlur, ScatterFilter};
pub use grid::{Color, PixelGrid};
pub use location::{parse_location, Location};
pub use random::{ChaChaSource, RandomSource};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
