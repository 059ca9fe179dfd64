/// An error type for the 3d module.
#[derive(thiserror::Error, Debug)]
pub enum GeometryError {
    /// Error coming from an image operation.
    #[error(transparent)]
    Image(#[from] objpose_image::ImageError),

    /// Failed to read a file.
    #[error("Failed to read file. {0}")]
    Io(#[from] std::io::Error),

    /// Malformed mesh file.
    #[error("Failed to parse mesh at line {line}: {message}")]
    MeshParse {
        /// 1-based line number of the offending statement.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A rotation could not be built from a degenerate input.
    #[error("Cannot build a rotation from a zero length {0}")]
    DegenerateRotation(&'static str),
}
