/// An error type for the pose estimation pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PoseError {
    /// Error coming from an image operation.
    #[error("Image error. {0}")]
    ImageError(#[from] objpose_image::ImageError),

    /// Error coming from a tensor operation.
    #[error("Tensor error. {0}")]
    TensorError(#[from] objpose_tensor::TensorError),

    /// Failed to read a model or configuration file.
    #[error("Failed to read file. {0}")]
    FileError(#[from] std::io::Error),

    /// Malformed configuration file.
    #[error("Failed to parse the configuration. {0}")]
    ConfigError(#[from] serde_json::Error),

    /// The model output does not have the expected shapes.
    #[error("Invalid model output: {0}")]
    InvalidOutput(String),

    /// The model output is not consistent with its input.
    #[error("Model returned {actual} instances for a batch of {expected}")]
    BatchSizeMismatch {
        /// Number of instances sent to the model.
        expected: usize,
        /// Number of instances returned by the model.
        actual: usize,
    },

    /// Error from the segmentation model.
    #[error("Segmentation failed: {0}")]
    SegmentationError(String),

    /// The ORT dylib path could not be resolved.
    #[cfg(feature = "onnx")]
    #[error("Failed to find the ORT dylib. {0}")]
    OrtDylibError(String),

    /// Error from ONNX Runtime.
    #[cfg(feature = "onnx")]
    #[error("ONNX Runtime error. {0}")]
    OrtError(#[from] ort::Error),
}
