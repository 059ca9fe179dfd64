#![deny(missing_docs)]
//! Image processing operations for instance crops and visualization

/// mask bounding box module.
pub mod bbox;

/// place images into fixed size canvases.
pub mod centerize;

/// label colormaps and label visualization.
pub mod color;

/// image cropping module.
pub mod crop;

/// utilities to draw on images.
pub mod draw;

/// utilities for interpolation.
pub mod interpolation;

/// operations restricted to a mask.
pub mod mask;

/// utility functions for resizing images.
pub mod resize;
