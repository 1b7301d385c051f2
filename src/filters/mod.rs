//! Pixel-level image filters.
//!
//! Every filter reads an input [`PixelGrid`](crate::grid::PixelGrid) and
//! returns a new grid of the same dimensions. Parameters are validated
//! once, when the filter is constructed; applying a constructed filter
//! cannot fail.
//!
//! | Filter            | Parameters                          | Output                |
//! |-------------------|-------------------------------------|-----------------------|
//! | [`ScatterFilter`] | radius                              | resampled colors      |
//! | [`EdgeDetector`]  | threshold                           | BLACK / WHITE only    |
//! | [`Compositor`]    | offset, tolerance, key color        | base with sticker     |
//! | [`GaussianBlur`]  | radius                              | smoothed colors       |

mod blur;
mod composite;
mod edge;
mod scatter;

pub use blur::{blur, gauss_kernel, BlurParams, GaussianBlur};
pub use composite::{composite, CompositeParams, Compositor};
pub use edge::{detect_edges, EdgeDetector, EdgeParams};
pub use scatter::{scatter, ScatterFilter, ScatterParams};

use thiserror::Error;

/// Largest radius accepted by scatter and blur.
pub const MAX_RADIUS: u32 = 100;

/// Errors raised while configuring a filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A parameter is outside its accepted range.
    #[error("invalid {name} {value}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: i64,
        /// Accepted range.
        reason: &'static str,
    },
}

/// Checks a scatter or blur radius against `1..=MAX_RADIUS`.
pub(crate) fn check_radius(name: &'static str, radius: u32) -> Result<(), FilterError> {
    let reason = if radius == 0 {
        "must be at least 1"
    } else if radius > MAX_RADIUS {
        "must be at most 100"
    } else {
        return Ok(());
    };
    Err(FilterError::InvalidParameter {
        name,
        value: i64::from(radius),
        reason,
    })
}
