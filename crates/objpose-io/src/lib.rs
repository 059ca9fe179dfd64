#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// PNG image encoding and decoding.
///
/// Read and write PNG images in rgb8, mono8 and mono16.
pub mod png;

/// Compressed archive of instance segmentation results.
pub mod detections;

/// Internal utility functions for image bit depth conversion.
mod conv_utils;

pub use crate::detections::Detections;
pub use crate::error::IoError;
