//! # ONNX models
//!
//! Pose regression and instance segmentation models exported to ONNX.
//!
//! Pre-requisites:
//! - ORT_DYLIB_PATH environment variable must be set to the path of the ORT dylib.

use std::path::{Path, PathBuf};

use objpose_image::{ops, Image, Mask};
use objpose_io::Detections;
use objpose_tensor::Tensor;
use ort::session::{builder::GraphOptimizationLevel, Session};

use crate::{
    config::ModelConfig,
    error::PoseError,
    model::{PoseInput, PoseOutput, PosePredictor},
    segment::{filter_by_score, foreground_labels, InstanceSegmenter},
};

/// Load the ONNX Runtime library pointed by the `ORT_DYLIB_PATH` environment variable.
pub fn init_ort_from_env() -> Result<(), PoseError> {
    let dylib_path =
        std::env::var("ORT_DYLIB_PATH").map_err(|e| PoseError::OrtDylibError(e.to_string()))?;
    ort::init_from(dylib_path).commit()?;
    Ok(())
}

fn build_session(model_path: &Path, num_threads: usize) -> Result<Session, PoseError> {
    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(num_threads)?
        .commit_from_file(model_path)?;
    Ok(session)
}

fn to_usize_shape<const N: usize>(shape: &[i64]) -> Result<[usize; N], PoseError> {
    if shape.len() != N {
        return Err(PoseError::InvalidOutput(format!(
            "expected {} dimensions, got {:?}",
            N, shape
        )));
    }
    let mut out = [0; N];
    for (o, &s) in out.iter_mut().zip(shape) {
        *o = usize::try_from(s)
            .map_err(|_| PoseError::InvalidOutput(format!("negative dimension in {:?}", shape)))?;
    }
    Ok(out)
}

/// Builder for the [`OnnxPoseModel`].
pub struct OnnxPoseModelBuilder {
    /// Path to the ONNX checkpoint. The `args` sidecar is read from its directory.
    pub model_path: PathBuf,
    /// Number of threads to use for inference.
    pub num_threads: usize,
}

impl OnnxPoseModelBuilder {
    /// Creates a builder with default settings.
    pub fn new(model_path: PathBuf) -> Self {
        Self {
            model_path,
            num_threads: 4,
        }
    }

    /// Sets the number of threads to use for inference.
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Reads the sidecar configuration and loads the model.
    pub fn build(self) -> Result<OnnxPoseModel, PoseError> {
        let config = ModelConfig::from_checkpoint(&self.model_path)?;
        let session = build_session(&self.model_path, self.num_threads)?;
        log::info!(
            "loaded pose model {} with {} foreground classes",
            self.model_path.display(),
            config.n_fg_class()
        );
        Ok(OnnxPoseModel { session, config })
    }
}

/// Single-view pose regressor running on ONNX Runtime.
///
/// The graph takes `class_id` `[N]` (i32), `rgb` `[N, S, S, 3]` (u8) and `pcd`
/// `[N, S, S, 3]` (f32) and returns `quaternion`, `translation` and `confidence`.
pub struct OnnxPoseModel {
    session: Session,
    config: ModelConfig,
}

impl OnnxPoseModel {
    /// The training arguments of the loaded checkpoint.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

impl PosePredictor for OnnxPoseModel {
    fn predict(&self, input: &PoseInput) -> Result<PoseOutput, PoseError> {
        let class_id = ort::value::Tensor::from_array((
            input.class_id.shape,
            input.class_id.as_slice().to_vec(),
        ))?;
        let rgb = ort::value::Tensor::from_array((input.rgb.shape, input.rgb.as_slice().to_vec()))?;
        let pcd = ort::value::Tensor::from_array((input.pcd.shape, input.pcd.as_slice().to_vec()))?;

        let outputs = self.session.run(ort::inputs![
            "class_id" => class_id,
            "rgb" => rgb,
            "pcd" => pcd,
        ]?)?;

        let (shape, data) = outputs["quaternion"].try_extract_raw_tensor::<f32>()?;
        let quaternion = Tensor::from_shape_vec(to_usize_shape::<3>(&shape)?, data.to_vec())?;

        let (shape, data) = outputs["translation"].try_extract_raw_tensor::<f32>()?;
        let translation = Tensor::from_shape_vec(to_usize_shape::<3>(&shape)?, data.to_vec())?;

        let (shape, data) = outputs["confidence"].try_extract_raw_tensor::<f32>()?;
        let confidence = Tensor::from_shape_vec(to_usize_shape::<2>(&shape)?, data.to_vec())?;

        Ok(PoseOutput {
            quaternion,
            translation,
            confidence,
        })
    }
}

/// Instance segmentation model running on ONNX Runtime.
///
/// The graph takes `image` `[1, 3, H, W]` (f32 in `[0, 1]`) and returns `masks`
/// `[N, H, W]` (probabilities), `labels` `[N]` (i64) and `scores` `[N]`.
pub struct OnnxInstanceSegmenter {
    session: Session,
    score_threshold: f32,
}

impl OnnxInstanceSegmenter {
    /// Loads the model.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the ONNX model.
    /// * `score_threshold` - Detections scoring lower are dropped.
    /// * `num_threads` - Number of threads to use for inference.
    pub fn new(
        model_path: impl AsRef<Path>,
        score_threshold: f32,
        num_threads: usize,
    ) -> Result<Self, PoseError> {
        let session = build_session(model_path.as_ref(), num_threads)?;
        log::info!(
            "loaded segmentation model {}",
            model_path.as_ref().display()
        );
        Ok(Self {
            session,
            score_threshold,
        })
    }
}

impl InstanceSegmenter for OnnxInstanceSegmenter {
    fn segment(&self, rgb: &Image<u8, 3>) -> Result<Detections, PoseError> {
        let size = rgb.size();

        // cast and scale the image to f32
        let mut image_hwc_f32 = Image::from_size_val(size, 0.0f32)?;
        ops::cast_and_scale(rgb, &mut image_hwc_f32, 1.0 / 255.)?;

        // HWC -> CHW
        let plane = size.area();
        let mut image_chw = vec![0.0f32; 3 * plane];
        for (i, pixel) in image_hwc_f32.as_slice().chunks_exact(3).enumerate() {
            for (c, &v) in pixel.iter().enumerate() {
                image_chw[c * plane + i] = v;
            }
        }
        let image = ort::value::Tensor::from_array(([1, 3, size.height, size.width], image_chw))?;

        let outputs = self.session.run(ort::inputs!["image" => image]?)?;

        let (mask_shape, mask_data) = outputs["masks"].try_extract_raw_tensor::<f32>()?;
        let [n, h, w] = to_usize_shape::<3>(&mask_shape)?;
        if [h, w] != [size.height, size.width] {
            return Err(PoseError::SegmentationError(format!(
                "masks of {}x{} for an image of {}",
                w, h, size
            )));
        }
        let (_, labels) = outputs["labels"].try_extract_raw_tensor::<i64>()?;
        let (_, scores) = outputs["scores"].try_extract_raw_tensor::<f32>()?;
        if labels.len() != n || scores.len() != n {
            return Err(PoseError::SegmentationError(format!(
                "{} masks, {} labels and {} scores",
                n,
                labels.len(),
                scores.len()
            )));
        }

        let masks = mask_data
            .chunks_exact(plane.max(1))
            .take(n)
            .map(|probs| Mask::new(size, probs.iter().map(|&p| p > 0.5).collect()))
            .collect::<Result<Vec<_>, _>>()?;

        let detections = Detections {
            masks,
            labels: foreground_labels(labels)?,
            scores: scores.to_vec(),
        };
        Ok(filter_by_score(detections, self.score_threshold))
    }
}
