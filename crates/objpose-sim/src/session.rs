use std::str::FromStr;

use objpose_3d::{
    aabb::aabb_contained_ratio,
    io::obj::read_obj,
    transforms::{
        axis_angle_to_quaternion, homogeneous_from_rt, quaternion_to_rotation_matrix,
        wxyz_to_xyzw, xyzw_to_wxyz,
    },
};

use crate::{
    backend::{BasePose, BodyId, DebugImage, MultiBodySpec, PhysicsBackend, ShapeType},
    error::SimError,
    model::ModelSpec,
    scene::{Scene, SceneGeometry},
};

/// Gravitational acceleration in m/s^2.
pub const GRAVITY: f64 = 9.8;

/// The up direction of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpAxis {
    /// Z points up.
    Z,
    /// Y points up.
    Y,
}

impl FromStr for UpAxis {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "z" => Ok(UpAxis::Z),
            "y" => Ok(UpAxis::Y),
            _ => Err(SimError::UnsupportedUpAxis(s.to_string())),
        }
    }
}

impl UpAxis {
    /// The (x, y, z, w) orientation of the ground plane.
    pub fn plane_orientation(&self) -> Result<[f64; 4], SimError> {
        match self {
            UpAxis::Z => Ok([0.0, 0.0, 0.0, 1.0]),
            UpAxis::Y => {
                let q = axis_angle_to_quaternion(&[1.0, 0.0, 0.0], -std::f64::consts::FRAC_PI_2)?;
                Ok(wxyz_to_xyzw(&q))
            }
        }
    }

    /// The gravity vector.
    pub fn gravity(&self) -> [f64; 3] {
        match self {
            UpAxis::Z => [0.0, 0.0, -GRAVITY],
            UpAxis::Y => [0.0, -GRAVITY, 0.0],
        }
    }
}

/// A simulated world and the bodies added to it.
pub struct SimSession<B: PhysicsBackend> {
    backend: B,
    bodies: Vec<BodyId>,
}

impl<B: PhysicsBackend> SimSession<B> {
    /// Connect to the engine and set up the ground plane and gravity.
    pub fn init_world(mut backend: B, up: UpAxis) -> Result<Self, SimError> {
        backend.connect()?;
        backend.load_plane(up.plane_orientation()?)?;
        backend.set_gravity(up.gravity())?;
        log::info!("initialized world with {:?} up", up);
        Ok(Self {
            backend,
            bodies: Vec::new(),
        })
    }

    /// The physics backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the physics backend, e.g. to step the simulation.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The bodies added with [`SimSession::add_model`], in insertion order.
    pub fn bodies(&self) -> &[BodyId] {
        &self.bodies
    }

    /// Add a mesh model to the world.
    ///
    /// # Returns
    ///
    /// The id of the new body.
    pub fn add_model(&mut self, spec: ModelSpec) -> Result<BodyId, SimError> {
        let mesh_scale = spec.mesh_scale.unwrap_or([1.0; 3]);
        let collision_file = spec
            .collision_file
            .clone()
            .unwrap_or_else(|| spec.visual_file.clone());

        let com_position = match spec.com_position {
            Some(com) => com,
            None => {
                let mut mesh = read_obj(&spec.visual_file)?;
                mesh.apply_scale(mesh_scale);
                mesh.centroid().unwrap_or([0.0; 3])
            }
        };

        let visual_shape = self
            .backend
            .create_visual_shape(&spec.visual_file, mesh_scale)?;
        let collision_shape = self
            .backend
            .create_collision_shape(&collision_file, mesh_scale)?;

        let body = self.backend.create_multi_body(&MultiBodySpec {
            mass: 1.0,
            inertial_frame_position: com_position,
            collision_shape,
            visual_shape,
            pose: BasePose {
                position: spec.position.unwrap_or([0.0; 3]),
                orientation: spec.orientation.unwrap_or([0.0, 0.0, 0.0, 1.0]),
            },
        })?;
        log::debug!("added body {} from {}", body, spec.visual_file.display());

        self.bodies.push(body);
        Ok(body)
    }

    /// Snapshot the bodies of the session as a static scene.
    ///
    /// # Arguments
    ///
    /// * `axis` - Add a coordinate frame node per body.
    /// * `bbox` - Add a wired bounding box node per body.
    ///
    /// # Errors
    ///
    /// Fails with [`SimError::UnsupportedShape`] if a body is not a mesh.
    pub fn scene(&self, axis: bool, bbox: bool) -> Result<Scene, SimError> {
        let mut scene = Scene::default();
        for &body in &self.bodies {
            let shape = self.backend.visual_shape_data(body)?;
            if shape.shape_type != ShapeType::Mesh {
                return Err(SimError::UnsupportedShape(shape.shape_type));
            }

            let pose = self.backend.base_pose(body)?;
            let rotation = quaternion_to_rotation_matrix(&xyzw_to_wxyz(&pose.orientation))?;
            let transform = homogeneous_from_rt(&rotation, &pose.position);

            let mesh = read_obj(&shape.mesh_file)?;
            let bounds = mesh.bounds();
            let extents = mesh.extents();

            scene.add_geometry(body.to_string(), SceneGeometry::Mesh(mesh), transform);

            if bbox {
                if let Some(bounds) = bounds {
                    scene.add_geometry(
                        format!("{body}_bbox"),
                        SceneGeometry::WiredBox(bounds),
                        transform,
                    );
                }
            }

            if axis {
                let origin_size = extents.iter().copied().fold(0.0, f64::max) * 0.05;
                scene.add_geometry(
                    format!("{body}_axis"),
                    SceneGeometry::Axis { origin_size },
                    transform,
                );
            }
        }
        Ok(scene)
    }

    /// Render the view of the debug visualizer camera.
    pub fn debug_visualizer_image(&self) -> Result<DebugImage, SimError> {
        self.backend.debug_camera_image()
    }

    /// How much of `body2` is contained by `body1`, from their world bounding boxes.
    pub fn aabb_contained_ratio(&self, body1: BodyId, body2: BodyId) -> Result<f64, SimError> {
        let aabb1 = self.backend.aabb(body1)?;
        let aabb2 = self.backend.aabb(body2)?;
        Ok(aabb_contained_ratio(&aabb1, &aabb2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ShapeId, VisualShapeData};
    use approx::assert_relative_eq;
    use objpose_3d::aabb::Aabb;
    use objpose_image::{Image, ImageSize};
    use std::{
        io::Write,
        path::{Path, PathBuf},
    };

    #[derive(Default)]
    struct MockBackend {
        connected: bool,
        plane_orientation: Option<[f64; 4]>,
        gravity: Option<[f64; 3]>,
        shapes: Vec<(PathBuf, [f64; 3])>,
        bodies: Vec<MultiBodySpec>,
        primitive_bodies: Vec<BodyId>,
    }

    impl MockBackend {
        fn shape(&self, id: ShapeId) -> Result<&(PathBuf, [f64; 3]), SimError> {
            self.shapes
                .get(id as usize)
                .ok_or_else(|| SimError::BackendError(format!("unknown shape {id}")))
        }

        fn body(&self, id: BodyId) -> Result<&MultiBodySpec, SimError> {
            // body 0 is the plane
            self.bodies
                .get((id - 1) as usize)
                .ok_or(SimError::UnknownBody(id))
        }
    }

    impl PhysicsBackend for MockBackend {
        fn connect(&mut self) -> Result<(), SimError> {
            self.connected = true;
            Ok(())
        }

        fn load_plane(&mut self, orientation: [f64; 4]) -> Result<BodyId, SimError> {
            self.plane_orientation = Some(orientation);
            Ok(0)
        }

        fn set_gravity(&mut self, gravity: [f64; 3]) -> Result<(), SimError> {
            self.gravity = Some(gravity);
            Ok(())
        }

        fn create_visual_shape(
            &mut self,
            mesh_file: &Path,
            mesh_scale: [f64; 3],
        ) -> Result<ShapeId, SimError> {
            self.shapes.push((mesh_file.to_path_buf(), mesh_scale));
            Ok(self.shapes.len() as ShapeId - 1)
        }

        fn create_collision_shape(
            &mut self,
            mesh_file: &Path,
            mesh_scale: [f64; 3],
        ) -> Result<ShapeId, SimError> {
            self.create_visual_shape(mesh_file, mesh_scale)
        }

        fn create_multi_body(&mut self, spec: &MultiBodySpec) -> Result<BodyId, SimError> {
            self.bodies.push(spec.clone());
            Ok(self.bodies.len() as BodyId)
        }

        fn visual_shape_data(&self, body: BodyId) -> Result<VisualShapeData, SimError> {
            let spec = self.body(body)?;
            let shape_type = if self.primitive_bodies.contains(&body) {
                ShapeType::Sphere
            } else {
                ShapeType::Mesh
            };
            Ok(VisualShapeData {
                shape_type,
                mesh_file: self.shape(spec.visual_shape)?.0.clone(),
            })
        }

        fn base_pose(&self, body: BodyId) -> Result<BasePose, SimError> {
            Ok(self.body(body)?.pose)
        }

        fn aabb(&self, body: BodyId) -> Result<Aabb, SimError> {
            let spec = self.body(body)?;
            let (_, scale) = self.shape(spec.visual_shape)?;
            let p = spec.pose.position;
            Ok(Aabb::new(
                [p[0] - scale[0], p[1] - scale[1], p[2] - scale[2]],
                [p[0] + scale[0], p[1] + scale[1], p[2] + scale[2]],
            ))
        }

        fn debug_camera_image(&self) -> Result<DebugImage, SimError> {
            let size = ImageSize {
                width: 4,
                height: 3,
            };
            Ok(DebugImage {
                rgba: Image::from_size_val(size, 255)?,
                depth: Image::from_size_val(size, 1.0)?,
                segmentation: Image::from_size_val(size, -1)?,
            })
        }
    }

    fn write_box_obj(dir: &Path) -> Result<PathBuf, std::io::Error> {
        // an axis-aligned box spanning [0, 2] x [0, 1] x [0, 1]
        let path = dir.join("box.obj");
        let mut file = std::fs::File::create(&path)?;
        writeln!(
            file,
            "v 0 0 0\nv 2 0 0\nv 2 1 0\nv 0 1 0\nv 0 0 1\nv 2 0 1\nv 2 1 1\nv 0 1 1\n\
             f 1 3 2\nf 1 4 3\nf 5 6 7\nf 5 7 8\nf 1 2 6\nf 1 6 5\n\
             f 4 7 3\nf 4 8 7\nf 1 5 8\nf 1 8 4\nf 2 3 7\nf 2 7 6"
        )?;
        Ok(path)
    }

    #[test]
    fn up_axis() -> Result<(), SimError> {
        assert_eq!("z".parse::<UpAxis>()?, UpAxis::Z);
        assert_eq!("y".parse::<UpAxis>()?, UpAxis::Y);
        assert!(matches!(
            "x".parse::<UpAxis>(),
            Err(SimError::UnsupportedUpAxis(_))
        ));

        let q = UpAxis::Y.plane_orientation()?;
        let half = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(q[0], -half, epsilon = 1e-12);
        assert_relative_eq!(q[3], half, epsilon = 1e-12);
        assert_eq!(UpAxis::Y.gravity(), [0.0, -9.8, 0.0]);
        Ok(())
    }

    #[test]
    fn init_world_sets_plane_and_gravity() -> Result<(), SimError> {
        let session = SimSession::init_world(MockBackend::default(), UpAxis::Z)?;
        let backend = session.backend();
        assert!(backend.connected);
        assert_eq!(backend.plane_orientation, Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(backend.gravity, Some([0.0, 0.0, -9.8]));
        assert!(session.bodies().is_empty());
        Ok(())
    }

    #[test]
    fn add_model_defaults() -> Result<(), SimError> {
        let tmp_dir = tempfile::tempdir().map_err(objpose_3d::GeometryError::from)?;
        let obj = write_box_obj(tmp_dir.path()).map_err(objpose_3d::GeometryError::from)?;

        let mut session = SimSession::init_world(MockBackend::default(), UpAxis::Z)?;
        let body = session.add_model(ModelSpec::new(&obj).with_uniform_scale(2.0))?;
        assert_eq!(session.bodies(), &[body]);

        let spec = &session.backend().bodies[0];
        assert_eq!(spec.mass, 1.0);
        assert_eq!(spec.pose, BasePose::default());
        // centroid of the scaled box
        assert_relative_eq!(spec.inertial_frame_position[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(spec.inertial_frame_position[1], 1.0, epsilon = 1e-9);
        assert_relative_eq!(spec.inertial_frame_position[2], 1.0, epsilon = 1e-9);

        // collision shape defaults to the visual mesh
        let shapes = &session.backend().shapes;
        assert_eq!(shapes[spec.collision_shape as usize].0, obj);
        assert_eq!(shapes[spec.visual_shape as usize].1, [2.0; 3]);
        Ok(())
    }

    #[test]
    fn scene_from_bodies() -> Result<(), SimError> {
        let tmp_dir = tempfile::tempdir().map_err(objpose_3d::GeometryError::from)?;
        let obj = write_box_obj(tmp_dir.path()).map_err(objpose_3d::GeometryError::from)?;

        let mut session = SimSession::init_world(MockBackend::default(), UpAxis::Z)?;
        session.add_model(
            ModelSpec::new(&obj)
                .with_com_position([0.0; 3])
                .with_position([1.0, 2.0, 3.0]),
        )?;
        session.add_model(ModelSpec::new(&obj).with_com_position([0.0; 3]))?;

        let scene = session.scene(true, true)?;
        assert_eq!(scene.nodes.len(), 6);
        assert_eq!(scene.num_meshes(), 2);
        assert_eq!(scene.nodes[0].name, "1");
        assert_eq!(scene.nodes[0].transform[0][3], 1.0);
        assert_eq!(scene.nodes[0].transform[2][3], 3.0);
        match scene.nodes[2].geometry {
            SceneGeometry::Axis { origin_size } => assert_relative_eq!(origin_size, 0.1),
            _ => panic!("expected an axis node"),
        }

        let plain = session.scene(false, false)?;
        assert_eq!(plain.nodes.len(), 2);

        session.backend_mut().primitive_bodies.push(2);
        assert!(matches!(
            session.scene(false, false),
            Err(SimError::UnsupportedShape(ShapeType::Sphere))
        ));
        Ok(())
    }

    #[test]
    fn contained_ratio_between_bodies() -> Result<(), SimError> {
        let mut session = SimSession::init_world(MockBackend::default(), UpAxis::Z)?;
        let big = session.add_model(
            ModelSpec::new("big.obj")
                .with_com_position([0.0; 3])
                .with_uniform_scale(2.0),
        )?;
        let small = session.add_model(
            ModelSpec::new("small.obj")
                .with_com_position([0.0; 3])
                .with_uniform_scale(1.0),
        )?;

        assert_eq!(session.aabb_contained_ratio(big, small)?, 1.0);
        assert_eq!(session.aabb_contained_ratio(small, big)?, 0.125);
        assert!(session.aabb_contained_ratio(big, 42).is_err());

        let image = session.debug_visualizer_image()?;
        assert_eq!(image.rgba.num_channels(), 4);
        assert_eq!(image.segmentation.size(), image.depth.size());
        Ok(())
    }
}
