use std::path::PathBuf;

/// A mesh model to add to the world.
///
/// Unset fields take their defaults when the model is added: the collision mesh is the
/// visual mesh, the center of mass is the centroid of the scaled mesh, the pose is the
/// identity and the scale is one.
///
/// ```
/// use objpose_sim::model::ModelSpec;
///
/// let spec = ModelSpec::new("models/003_cracker_box/textured_simple.obj")
///     .with_position([0.0, 0.0, 0.3])
///     .with_uniform_scale(0.5);
/// assert_eq!(spec.mesh_scale, Some([0.5, 0.5, 0.5]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    /// Mesh used for rendering.
    pub visual_file: PathBuf,
    /// Mesh used for collisions.
    pub collision_file: Option<PathBuf>,
    /// Initial position of the base.
    pub position: Option<[f64; 3]>,
    /// Initial (x, y, z, w) orientation of the base.
    pub orientation: Option<[f64; 4]>,
    /// Scale applied to both meshes.
    pub mesh_scale: Option<[f64; 3]>,
    /// Center of mass in the body frame.
    pub com_position: Option<[f64; 3]>,
}

impl ModelSpec {
    /// Creates a spec for the given visual mesh.
    pub fn new(visual_file: impl Into<PathBuf>) -> Self {
        Self {
            visual_file: visual_file.into(),
            collision_file: None,
            position: None,
            orientation: None,
            mesh_scale: None,
            com_position: None,
        }
    }

    /// Sets a separate collision mesh.
    pub fn with_collision_file(mut self, collision_file: impl Into<PathBuf>) -> Self {
        self.collision_file = Some(collision_file.into());
        self
    }

    /// Sets the initial position.
    pub fn with_position(mut self, position: [f64; 3]) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the initial (x, y, z, w) orientation.
    pub fn with_orientation(mut self, orientation: [f64; 4]) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Sets a per-axis mesh scale.
    pub fn with_mesh_scale(mut self, mesh_scale: [f64; 3]) -> Self {
        self.mesh_scale = Some(mesh_scale);
        self
    }

    /// Sets the same mesh scale on every axis.
    pub fn with_uniform_scale(self, scale: f64) -> Self {
        self.with_mesh_scale([scale; 3])
    }

    /// Sets the center of mass.
    pub fn with_com_position(mut self, com_position: [f64; 3]) -> Self {
        self.com_position = Some(com_position);
        self
    }
}
