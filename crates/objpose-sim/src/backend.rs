use std::{
    fmt,
    path::{Path, PathBuf},
};

use objpose_3d::aabb::Aabb;
use objpose_image::Image;

use crate::error::SimError;

/// Identifier of a body in the physics world.
pub type BodyId = i32;

/// Identifier of a visual or collision shape.
pub type ShapeId = i32;

/// Geometry type of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    /// Box primitive.
    Box,
    /// Capsule primitive.
    Capsule,
    /// Cylinder primitive.
    Cylinder,
    /// Triangle mesh loaded from a file.
    Mesh,
    /// Infinite plane.
    Plane,
    /// Sphere primitive.
    Sphere,
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeType::Box => "GEOM_BOX",
            ShapeType::Capsule => "GEOM_CAPSULE",
            ShapeType::Cylinder => "GEOM_CYLINDER",
            ShapeType::Mesh => "GEOM_MESH",
            ShapeType::Plane => "GEOM_PLANE",
            ShapeType::Sphere => "GEOM_SPHERE",
        };
        write!(f, "{name}")
    }
}

/// Visual shape of a body.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualShapeData {
    /// Geometry type of the shape.
    pub shape_type: ShapeType,
    /// Mesh file of the shape, empty for primitives.
    pub mesh_file: PathBuf,
}

/// Position and (x, y, z, w) orientation of a body base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasePose {
    /// Position in world coordinates.
    pub position: [f64; 3],
    /// Orientation as a (x, y, z, w) quaternion.
    pub orientation: [f64; 4],
}

impl Default for BasePose {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            orientation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Parameters of a rigid body made of one visual and one collision shape.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiBodySpec {
    /// Mass in kilograms.
    pub mass: f64,
    /// Center of mass in the body frame.
    pub inertial_frame_position: [f64; 3],
    /// Collision shape of the base.
    pub collision_shape: ShapeId,
    /// Visual shape of the base.
    pub visual_shape: ShapeId,
    /// Initial pose of the base.
    pub pose: BasePose,
}

/// Image rendered by the debug visualizer camera.
#[derive(Debug, Clone)]
pub struct DebugImage {
    /// Color image.
    pub rgba: Image<u8, 4>,
    /// Depth buffer.
    pub depth: Image<f32, 1>,
    /// Body id of every pixel, negative where empty.
    pub segmentation: Image<i32, 1>,
}

/// A physics engine.
pub trait PhysicsBackend {
    /// Connect to the engine.
    fn connect(&mut self) -> Result<(), SimError>;

    /// Load the ground plane with the given (x, y, z, w) orientation.
    fn load_plane(&mut self, orientation: [f64; 4]) -> Result<BodyId, SimError>;

    /// Set the world gravity.
    fn set_gravity(&mut self, gravity: [f64; 3]) -> Result<(), SimError>;

    /// Create a visual shape from a mesh file.
    fn create_visual_shape(
        &mut self,
        mesh_file: &Path,
        mesh_scale: [f64; 3],
    ) -> Result<ShapeId, SimError>;

    /// Create a collision shape from a mesh file.
    fn create_collision_shape(
        &mut self,
        mesh_file: &Path,
        mesh_scale: [f64; 3],
    ) -> Result<ShapeId, SimError>;

    /// Create a rigid body.
    fn create_multi_body(&mut self, spec: &MultiBodySpec) -> Result<BodyId, SimError>;

    /// The visual shape of a body.
    fn visual_shape_data(&self, body: BodyId) -> Result<VisualShapeData, SimError>;

    /// The current base pose of a body.
    fn base_pose(&self, body: BodyId) -> Result<BasePose, SimError>;

    /// The world axis-aligned bounding box of a body.
    fn aabb(&self, body: BodyId) -> Result<Aabb, SimError>;

    /// Render the view of the debug visualizer camera.
    fn debug_camera_image(&self) -> Result<DebugImage, SimError>;
}
