use objpose_dnn::PoseResult;
use serde::{Deserialize, Serialize};

use crate::{
    error::NodeError,
    models::MeshResolver,
    msgs::{Duration, Header},
};

/// Namespace of the pose markers.
pub const NAMESPACE: &str = "/singleview_3d_pose_estimation";

/// A 3D vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

/// An orientation quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
    /// W component.
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

/// A position and an orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position.
    pub position: Vector3,
    /// Orientation.
    pub orientation: Quaternion,
}

/// A color with transparency, channels in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorRGBA {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

/// Kind of geometry drawn by a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkerType {
    /// A mesh loaded from a resource.
    MeshResource,
}

/// What to do with a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkerAction {
    /// Add or replace the marker.
    Add,
    /// Remove the marker.
    Delete,
}

/// A visualization marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Header of the frame the marker belongs to.
    pub header: Header,
    /// Namespace, unique together with the id.
    pub ns: String,
    /// Id within the namespace.
    pub id: i32,
    /// Geometry kind.
    #[serde(rename = "type")]
    pub marker_type: MarkerType,
    /// Action.
    pub action: MarkerAction,
    /// Pose in the header frame.
    pub pose: Pose,
    /// Scale of the geometry.
    pub scale: Vector3,
    /// Color, unused with embedded materials.
    pub color: ColorRGBA,
    /// How long the marker is shown.
    pub lifetime: Duration,
    /// Mesh url.
    pub mesh_resource: String,
    /// Whether to use the materials of the mesh.
    pub mesh_use_embedded_materials: bool,
}

/// Markers published together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerArray {
    /// The markers.
    pub markers: Vec<Marker>,
}

/// Create the mesh marker of one estimated pose.
///
/// # Arguments
///
/// * `header` - Header of the frame the pose was estimated on.
/// * `index` - Index of the instance in the frame, used as marker id.
/// * `pose` - The estimated pose, with a (w, x, y, z) quaternion.
/// * `mesh_path` - Mesh file of the object class.
pub fn pose_marker(
    header: &Header,
    index: usize,
    pose: &PoseResult,
    mesh_path: &std::path::Path,
) -> Marker {
    let [w, x, y, z] = pose.quaternion.map(f64::from);
    let [tx, ty, tz] = pose.translation.map(f64::from);
    Marker {
        header: header.clone(),
        ns: NAMESPACE.to_string(),
        id: index as i32,
        marker_type: MarkerType::MeshResource,
        action: MarkerAction::Add,
        pose: Pose {
            position: Vector3 {
                x: tx,
                y: ty,
                z: tz,
            },
            orientation: Quaternion { x, y, z, w },
        },
        scale: Vector3 {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        },
        color: ColorRGBA::default(),
        lifetime: Duration { sec: 0, nanosec: 1 },
        mesh_resource: format!("file://{}", mesh_path.display()),
        mesh_use_embedded_materials: true,
    }
}

/// Create the markers of all poses of a frame.
pub fn markers_from_poses(
    header: &Header,
    poses: &[PoseResult],
    resolver: &impl MeshResolver,
) -> Result<MarkerArray, NodeError> {
    let markers = poses
        .iter()
        .enumerate()
        .map(|(i, pose)| {
            let path = resolver.mesh_path(pose.class_id)?;
            Ok(pose_marker(header, i, pose, &path))
        })
        .collect::<Result<Vec<_>, NodeError>>()?;
    Ok(MarkerArray { markers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::YcbVideoModels;
    use crate::msgs::Time;

    fn pose(class_id: i32) -> PoseResult {
        PoseResult {
            class_id,
            quaternion: [0.5, 0.25, 0.125, 1.0],
            translation: [0.1, -0.2, 0.75],
            confidence: 0.9,
        }
    }

    fn header() -> Header {
        Header {
            seq: 3,
            stamp: Time::new(10, 500),
            frame_id: "camera_color_optical_frame".to_string(),
        }
    }

    #[test]
    fn marker_of_pose() {
        let path = std::path::Path::new("/data/models/003_cracker_box/textured_simple.obj");
        let marker = pose_marker(&header(), 2, &pose(2), path);

        assert_eq!(marker.header, header());
        assert_eq!(marker.ns, NAMESPACE);
        assert_eq!(marker.id, 2);
        assert_eq!(marker.marker_type, MarkerType::MeshResource);
        assert_eq!(marker.action, MarkerAction::Add);
        assert_eq!(
            marker.pose.orientation,
            Quaternion {
                x: 0.25,
                y: 0.125,
                z: 1.0,
                w: 0.5
            }
        );
        assert_eq!(marker.pose.position.z, 0.75);
        assert_eq!(marker.scale.x, 1.0);
        assert_eq!(marker.lifetime, Duration { sec: 0, nanosec: 1 });
        assert_eq!(
            marker.mesh_resource,
            "file:///data/models/003_cracker_box/textured_simple.obj"
        );
        assert!(marker.mesh_use_embedded_materials);
    }

    #[test]
    fn markers_indexed_by_instance() -> Result<(), NodeError> {
        let models = YcbVideoModels::new("/data");
        let array = markers_from_poses(&header(), &[pose(1), pose(5)], &models)?;
        let ids = array.markers.iter().map(|m| m.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![0, 1]);
        assert!(array.markers[1].mesh_resource.contains("006_mustard_bottle"));

        let unknown = markers_from_poses(&header(), &[pose(1), pose(0)], &models);
        assert!(matches!(unknown, Err(NodeError::UnknownClass(0))));
        Ok(())
    }

    #[test]
    fn marker_json() -> Result<(), NodeError> {
        let marker = pose_marker(&header(), 0, &pose(1), std::path::Path::new("/m.obj"));
        let value = serde_json::to_value(&marker)?;
        assert_eq!(value["type"], "MESH_RESOURCE");
        assert_eq!(value["action"], "ADD");
        assert_eq!(value["ns"], NAMESPACE);
        Ok(())
    }
}
