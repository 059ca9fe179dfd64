use objpose_3d::{aabb::Aabb, mesh::TriangleMesh};

/// Geometry attached to a scene node.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneGeometry {
    /// A triangle mesh.
    Mesh(TriangleMesh),
    /// The edges of a box.
    WiredBox(Aabb),
    /// A coordinate frame drawn with the given origin size.
    Axis {
        /// Size of the frame origin.
        origin_size: f64,
    },
}

/// A geometry placed in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Name of the node, the body id for meshes.
    pub name: String,
    /// The geometry.
    pub geometry: SceneGeometry,
    /// Homogeneous transform from the geometry frame to the world.
    pub transform: [[f64; 4]; 4],
}

/// A static snapshot of the simulated bodies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// The scene nodes, in insertion order.
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    /// Add a node to the scene.
    pub fn add_geometry(
        &mut self,
        name: impl Into<String>,
        geometry: SceneGeometry,
        transform: [[f64; 4]; 4],
    ) {
        self.nodes.push(SceneNode {
            name: name.into(),
            geometry,
            transform,
        });
    }

    /// Number of mesh nodes.
    pub fn num_meshes(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.geometry, SceneGeometry::Mesh(_)))
            .count()
    }
}
