use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::PoseError;

/// Name of the sidecar file holding the training arguments of a checkpoint.
pub const MODEL_ARGS_FILE: &str = "args";

/// Parameters of the per-frame estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Instances with fewer mask pixels are discarded.
    pub min_instance_pixels: usize,
    /// Side length of the square network input crops.
    pub crop_size: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            min_instance_pixels: 50,
            crop_size: 256,
        }
    }
}

/// Loss weighting stored in the training arguments, either one factor or one per term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LossScale {
    /// A single factor.
    Scalar(f64),
    /// A factor per loss term.
    PerTerm(BTreeMap<String, f64>),
}

/// Training arguments saved next to a model checkpoint.
///
/// The pose model is rebuilt from these arguments before its weights are loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Class names, index 0 being the background.
    pub class_names: Vec<String>,
    /// Whether the RGB encoder started from ImageNet weights.
    #[serde(default)]
    pub pretrained_resnet18: bool,
    /// Whether the model was trained with the occupancy grid input.
    #[serde(default)]
    pub with_occupancy: bool,
    /// Name of the training loss.
    #[serde(default)]
    pub loss: String,
    /// Loss weighting.
    #[serde(default)]
    pub loss_scale: Option<LossScale>,
}

impl ModelConfig {
    /// Read the `args` file found in the directory of `checkpoint`.
    ///
    /// # Arguments
    ///
    /// * `checkpoint` - Path to the model weights.
    ///
    /// # Errors
    ///
    /// Fails if the sidecar file is missing or malformed.
    pub fn from_checkpoint(checkpoint: impl AsRef<Path>) -> Result<Self, PoseError> {
        let checkpoint = checkpoint.as_ref();
        let args_file = checkpoint
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(MODEL_ARGS_FILE);
        Self::from_file(args_file)
    }

    /// Read the training arguments from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PoseError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Number of foreground classes.
    pub fn n_fg_class(&self) -> usize {
        self.class_names.len().saturating_sub(1)
    }
}
