use std::path::{Path, PathBuf};

use crate::error::NodeError;

/// Names of the YCB-Video classes, indexed by class id.
pub const YCB_VIDEO_CLASS_NAMES: [&str; 22] = [
    "__background__",
    "002_master_chef_can",
    "003_cracker_box",
    "004_sugar_box",
    "005_tomato_soup_can",
    "006_mustard_bottle",
    "007_tuna_fish_can",
    "008_pudding_box",
    "009_gelatin_box",
    "010_potted_meat_can",
    "011_banana",
    "019_pitcher_base",
    "021_bleach_cleanser",
    "024_bowl",
    "025_mug",
    "035_power_drill",
    "036_wood_block",
    "037_scissors",
    "040_large_marker",
    "051_large_clamp",
    "052_extra_large_clamp",
    "061_foam_brick",
];

/// Maps a class id to the mesh of its object model.
pub trait MeshResolver {
    /// The mesh file of the class.
    fn mesh_path(&self, class_id: i32) -> Result<PathBuf, NodeError>;
}

/// Object models of the YCB-Video dataset laid out as
/// `<root>/models/<class name>/textured_simple.obj`.
#[derive(Debug, Clone)]
pub struct YcbVideoModels {
    root: PathBuf,
}

impl YcbVideoModels {
    /// Creates a resolver for the dataset at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The dataset root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The class name of a foreground class id.
    pub fn class_name(class_id: i32) -> Option<&'static str> {
        match usize::try_from(class_id) {
            Ok(0) | Err(_) => None,
            Ok(i) => YCB_VIDEO_CLASS_NAMES.get(i).copied(),
        }
    }
}

impl MeshResolver for YcbVideoModels {
    fn mesh_path(&self, class_id: i32) -> Result<PathBuf, NodeError> {
        let name = Self::class_name(class_id).ok_or(NodeError::UnknownClass(class_id))?;
        Ok(self
            .root
            .join("models")
            .join(name)
            .join("textured_simple.obj"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_paths() -> Result<(), NodeError> {
        let models = YcbVideoModels::new("/data/ycb_video");
        assert_eq!(
            models.mesh_path(1)?,
            PathBuf::from("/data/ycb_video/models/002_master_chef_can/textured_simple.obj")
        );
        assert_eq!(
            models.mesh_path(21)?,
            PathBuf::from("/data/ycb_video/models/061_foam_brick/textured_simple.obj")
        );
        Ok(())
    }

    #[test]
    fn unknown_classes() {
        let models = YcbVideoModels::new("/data");
        for class_id in [-1, 0, 22] {
            assert!(matches!(
                models.mesh_path(class_id),
                Err(NodeError::UnknownClass(id)) if id == class_id
            ));
        }
    }
}
