#![deny(missing_docs)]
//! Middleware node streaming synchronized RGB-D frames through the pose estimator and
//! publishing mesh markers of the estimated poses.

/// Error types for the node module.
pub mod error;

/// Lazy subscription management.
pub mod lazy;

/// Mesh markers of estimated poses.
pub mod marker;

/// Object model lookup.
pub mod models;

/// Camera and image messages.
pub mod msgs;

/// The pose estimation node.
pub mod node;

/// Result sinks.
pub mod sink;

/// Exact time synchronization of the input streams.
pub mod sync;

pub use crate::error::NodeError;
pub use crate::node::SingleViewPoseNode;
