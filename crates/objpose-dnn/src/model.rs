use objpose_tensor::{Tensor1, Tensor2, Tensor3, Tensor4};

use crate::error::PoseError;

/// Batched network input, one row per instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseInput {
    /// Class id of every instance, shape `[N]`.
    pub class_id: Tensor1<i32>,
    /// Centered RGB crops, shape `[N, S, S, 3]`.
    pub rgb: Tensor4<u8>,
    /// Centered point cloud crops in meters, shape `[N, S, S, 3]`, NaN where invalid.
    pub pcd: Tensor4<f32>,
}

impl PoseInput {
    /// Number of instances in the batch.
    pub fn batch_size(&self) -> usize {
        self.class_id.shape[0]
    }
}

/// Multi-hypothesis pose prediction for a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseOutput {
    /// Rotations as (w, x, y, z) quaternions, shape `[N, H, 4]`.
    pub quaternion: Tensor3<f32>,
    /// Translations in meters, shape `[N, H, 3]`.
    pub translation: Tensor3<f32>,
    /// Confidence of every hypothesis, shape `[N, H]`.
    pub confidence: Tensor2<f32>,
}

/// A pose regression model.
///
/// Implementations are read-only during inference.
pub trait PosePredictor {
    /// Predict pose hypotheses for every instance of the batch.
    fn predict(&self, input: &PoseInput) -> Result<PoseOutput, PoseError>;
}

impl<P: PosePredictor + ?Sized> PosePredictor for &P {
    fn predict(&self, input: &PoseInput) -> Result<PoseOutput, PoseError> {
        (**self).predict(input)
    }
}

impl<P: PosePredictor + ?Sized> PosePredictor for Box<P> {
    fn predict(&self, input: &PoseInput) -> Result<PoseOutput, PoseError> {
        (**self).predict(input)
    }
}
