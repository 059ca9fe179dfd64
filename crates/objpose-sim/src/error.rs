use crate::backend::{BodyId, ShapeType};

/// An error type for the simulator module.
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    /// The world up direction is not supported.
    #[error("Unsupported up direction: {0}")]
    UnsupportedUpAxis(String),

    /// A body has a shape that cannot be turned into a scene node.
    #[error("Unsupported shape: {0}")]
    UnsupportedShape(ShapeType),

    /// The body is not known to the backend.
    #[error("Unknown body id: {0}")]
    UnknownBody(BodyId),

    /// Error reading or processing a mesh.
    #[error(transparent)]
    GeometryError(#[from] objpose_3d::GeometryError),

    /// Error creating an image.
    #[error(transparent)]
    ImageError(#[from] objpose_image::ImageError),

    /// Error reported by the physics engine.
    #[error("Physics backend error: {0}")]
    BackendError(String),
}
