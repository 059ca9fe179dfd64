use objpose_3d::{camera::PinholeCamera, depth::sanitize_depth, pointcloud::pointcloud_from_depth};
use objpose_image::{Image, ImageError};
use objpose_io::Detections;

use crate::{
    batch::concat_examples,
    config::EstimatorConfig,
    crop::{examples_from_labels, examples_from_masks, InstanceExample},
    error::PoseError,
    model::PosePredictor,
    select::select_best_poses,
};

/// One RGB-D frame with its camera intrinsics.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Color image.
    pub rgb: Image<u8, 3>,
    /// Depth in meters, NaN where invalid.
    pub depth: Image<f32, 1>,
    /// Intrinsics of the camera that captured the frame.
    pub camera: PinholeCamera,
}

impl Frame {
    /// Creates a frame, checking that color and depth share one size.
    ///
    /// Depth that is zero, negative or not finite is stored as NaN.
    pub fn new(
        rgb: Image<u8, 3>,
        mut depth: Image<f32, 1>,
        camera: PinholeCamera,
    ) -> Result<Self, ImageError> {
        if rgb.size() != depth.size() {
            return Err(ImageError::InvalidImageSize(
                rgb.cols(),
                rgb.rows(),
                depth.cols(),
                depth.rows(),
            ));
        }
        sanitize_depth(&mut depth);
        Ok(Self { rgb, depth, camera })
    }

    /// The organized point cloud of the frame.
    pub fn pointcloud(&self) -> Result<Image<f32, 3>, ImageError> {
        let c = &self.camera;
        pointcloud_from_depth(&self.depth, c.fx, c.fy, c.cx, c.cy)
    }
}

/// The estimated pose of one object instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseResult {
    /// Class id of the instance.
    pub class_id: i32,
    /// Rotation as a (w, x, y, z) quaternion.
    pub quaternion: [f32; 4],
    /// Translation in meters, in the camera frame.
    pub translation: [f32; 3],
    /// Confidence of the selected hypothesis.
    pub confidence: f32,
}

/// Frame by frame 6D pose estimator around a pose regression model.
///
/// The estimator keeps no state across frames.
pub struct SingleViewPoseEstimator<P: PosePredictor> {
    model: P,
    config: EstimatorConfig,
}

impl<P: PosePredictor> SingleViewPoseEstimator<P> {
    /// Creates an estimator with the given model.
    pub fn new(model: P, config: EstimatorConfig) -> Self {
        Self { model, config }
    }

    /// The estimator configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// The pose model.
    pub fn model(&self) -> &P {
        &self.model
    }

    /// Estimate the pose of every instance of a frame given dense label maps.
    ///
    /// # Arguments
    ///
    /// * `frame` - The RGB-D frame.
    /// * `label_ins` - Dense instance ids, negative for background.
    /// * `label_cls` - Dense class ids.
    ///
    /// # Returns
    ///
    /// One result per instance with at least `min_instance_pixels` pixels, in ascending
    /// instance id order. Frames without such instances give no result and the model is
    /// not called.
    pub fn process_frame(
        &self,
        frame: &Frame,
        label_ins: &Image<i32, 1>,
        label_cls: &Image<i32, 1>,
    ) -> Result<Vec<PoseResult>, PoseError> {
        let pcd = frame.pointcloud()?;
        let examples = examples_from_labels(&frame.rgb, &pcd, label_ins, label_cls, &self.config)?;
        self.estimate(&examples)
    }

    /// Estimate the pose of every detection of a frame.
    ///
    /// Detection labels are foreground indices, so label `l` is class id `l + 1`.
    pub fn process_detections(
        &self,
        frame: &Frame,
        detections: &Detections,
    ) -> Result<Vec<PoseResult>, PoseError> {
        let pcd = frame.pointcloud()?;
        let class_ids = detections
            .labels
            .iter()
            .map(|&l| l as i32 + 1)
            .collect::<Vec<_>>();
        let examples = examples_from_masks(
            &frame.rgb,
            &pcd,
            &detections.masks,
            &class_ids,
            &self.config,
        )?;
        self.estimate(&examples)
    }

    /// Run the model on prepared examples and select one pose per example.
    pub fn estimate(&self, examples: &[InstanceExample]) -> Result<Vec<PoseResult>, PoseError> {
        let Some(input) = concat_examples(examples)? else {
            log::debug!("no instance to estimate");
            return Ok(Vec::new());
        };

        let output = self.model.predict(&input)?;
        let poses = select_best_poses(&output)?;
        if poses.len() != examples.len() {
            return Err(PoseError::BatchSizeMismatch {
                expected: examples.len(),
                actual: poses.len(),
            });
        }
        log::debug!("estimated {} poses", poses.len());

        Ok(examples
            .iter()
            .zip(poses)
            .map(|(example, pose)| PoseResult {
                class_id: example.class_id,
                quaternion: pose.quaternion,
                translation: pose.translation,
                confidence: pose.confidence,
            })
            .collect())
    }
}
