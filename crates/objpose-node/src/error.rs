/// An error type for the node module.
#[derive(thiserror::Error, Debug)]
pub enum NodeError {
    /// The image encoding is not the one expected.
    #[error("Unsupported encoding {actual}, expected one of {expected}")]
    UnsupportedEncoding {
        /// The accepted encodings.
        expected: String,
        /// The encoding of the message.
        actual: String,
    },

    /// The image buffer is smaller than its declared size.
    #[error("Image buffer of {actual} bytes, expected at least {expected}")]
    BufferTooShort {
        /// Required number of bytes.
        expected: usize,
        /// Number of bytes in the message.
        actual: usize,
    },

    /// No object model for the class id.
    #[error("No model for class id {0}")]
    UnknownClass(i32),

    /// Error coming from an image operation.
    #[error(transparent)]
    ImageError(#[from] objpose_image::ImageError),

    /// Error from the pose estimator.
    #[error(transparent)]
    PoseError(#[from] objpose_dnn::PoseError),

    /// Error writing an image.
    #[error(transparent)]
    IoError(#[from] objpose_io::IoError),

    /// Error writing a file.
    #[error("Failed to write file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error serializing markers.
    #[error("Failed to serialize. {0}")]
    SerializationError(#[from] serde_json::Error),
}
