/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Invalid file extension.
    #[error("File does not have a valid extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] objpose_image::ImageError),

    /// Error to encode the PNG image.
    #[error("Failed to encode the png image. {0}")]
    PngEncodingError(String),

    /// Error to decode the PNG image.
    #[error("Failed to decode the png image. {0}")]
    PngDecodeError(String),

    /// Error to serialize a detections archive.
    #[error("Failed to encode the archive. {0}")]
    ArchiveEncodeError(#[from] bincode::error::EncodeError),

    /// Error to deserialize a detections archive.
    #[error("Failed to decode the archive. {0}")]
    ArchiveDecodeError(#[from] bincode::error::DecodeError),

    /// The archive content is inconsistent.
    #[error("Invalid detections archive: {0}")]
    InvalidArchive(String),
}
