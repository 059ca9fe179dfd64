#![deny(missing_docs)]
//! # objpose DNN
//!
//! The instance-to-pose inference pipeline: per-instance crops from a segmentation,
//! batched network input, the pose regression boundary and hypothesis selection.

/// Error type for the dnn module.
pub mod error;

/// Estimator and model configuration.
pub mod config;

/// The pose regression model boundary.
pub mod model;

/// Instance masks and class votes from dense label maps.
pub mod instance;

/// Fixed size per-instance crops.
pub mod crop;

/// Batching of instance crops into one network input.
pub mod batch;

/// Best hypothesis selection.
pub mod select;

/// Frame level estimator.
pub mod pipeline;

/// The instance segmentation boundary.
pub mod segment;

/// ONNX Runtime backed models.
#[cfg(feature = "onnx")]
pub mod onnx;

pub use crate::config::{EstimatorConfig, ModelConfig};
pub use crate::error::PoseError;
pub use crate::model::{PoseInput, PoseOutput, PosePredictor};
pub use crate::pipeline::{Frame, PoseResult, SingleViewPoseEstimator};
pub use crate::segment::InstanceSegmenter;
