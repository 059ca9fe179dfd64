#![deny(missing_docs)]
//! 3d geometry for RGB-D pose estimation: point clouds, transforms and meshes

/// Axis-aligned bounding boxes in 3d.
pub mod aabb;

/// Pinhole camera model.
pub mod camera;

/// Depth map conversions.
pub mod depth;

/// Error types for the 3d module.
pub mod error;

/// I/O utilities for reading 3D data.
pub mod io;

/// Triangle meshes.
pub mod mesh;

/// Point cloud reconstruction from depth.
pub mod pointcloud;

/// 3D transforms algorithms.
pub mod transforms;

pub use crate::error::GeometryError;
