use crate::{error::PoseError, model::PoseOutput};

/// The best hypothesis of one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedPose {
    /// Index of the selected hypothesis.
    pub hypothesis: usize,
    /// Rotation as a (w, x, y, z) quaternion.
    pub quaternion: [f32; 4],
    /// Translation in meters.
    pub translation: [f32; 3],
    /// Confidence of the selected hypothesis.
    pub confidence: f32,
}

/// Index of the first maximum of `values`.
///
/// NaN values are never preferred over a finite one. Returns `None` for an empty slice.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            None => best = Some((i, v)),
            Some((_, b)) if b.is_nan() && !v.is_nan() => best = Some((i, v)),
            Some((_, b)) if v > b => best = Some((i, v)),
            _ => {}
        }
    }
    best.map(|(i, _)| i)
}

/// Pick the highest confidence hypothesis of every instance.
///
/// # Arguments
///
/// * `output` - Quaternions `[N, H, 4]`, translations `[N, H, 3]` and confidences `[N, H]`.
///
/// # Returns
///
/// One selection per instance, in batch order. Quaternion and translation are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use objpose_dnn::model::PoseOutput;
/// use objpose_dnn::select::select_best_poses;
/// use objpose_tensor::Tensor;
///
/// let output = PoseOutput {
///     quaternion: Tensor::from_shape_val([1, 3, 4], 0.5),
///     translation: Tensor::from_shape_val([1, 3, 3], 0.0),
///     confidence: Tensor::from_shape_vec([1, 3], vec![0.1, 0.9, 0.2]).unwrap(),
/// };
/// let poses = select_best_poses(&output).unwrap();
/// assert_eq!(poses[0].hypothesis, 1);
/// ```
pub fn select_best_poses(output: &PoseOutput) -> Result<Vec<SelectedPose>, PoseError> {
    let [n, h] = output.confidence.shape;
    if output.quaternion.shape != [n, h, 4] {
        return Err(PoseError::InvalidOutput(format!(
            "quaternion shape {:?}, expected {:?}",
            output.quaternion.shape,
            [n, h, 4]
        )));
    }
    if output.translation.shape != [n, h, 3] {
        return Err(PoseError::InvalidOutput(format!(
            "translation shape {:?}, expected {:?}",
            output.translation.shape,
            [n, h, 3]
        )));
    }
    if h == 0 && n > 0 {
        return Err(PoseError::InvalidOutput(
            "no hypothesis per instance".to_string(),
        ));
    }

    (0..n)
        .map(|i| {
            let confidence = output.confidence.outer(i);
            let hypothesis = argmax(confidence)
                .ok_or_else(|| PoseError::InvalidOutput("empty confidence".to_string()))?;

            let q = &output.quaternion.outer(i)[hypothesis * 4..hypothesis * 4 + 4];
            let t = &output.translation.outer(i)[hypothesis * 3..hypothesis * 3 + 3];
            Ok(SelectedPose {
                hypothesis,
                quaternion: [q[0], q[1], q[2], q[3]],
                translation: [t[0], t[1], t[2]],
                confidence: confidence[hypothesis],
            })
        })
        .collect()
}
