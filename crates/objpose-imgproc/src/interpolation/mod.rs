//! Pixel interpolation methods used when resampling images.
//!
//! - **Nearest**: copies the closest source pixel. Required for point clouds, where
//!   blending would mix valid points with NaN padding or across depth discontinuities.
//! - **Bilinear**: smooth linear interpolation between the four neighbouring pixels.

mod bilinear;
mod interpolate;
mod nearest;

pub use interpolate::{interpolate_pixel, InterpolationMode};
