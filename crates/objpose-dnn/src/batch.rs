use objpose_tensor::{Tensor1, Tensor4};

use crate::{crop::InstanceExample, error::PoseError, model::PoseInput};

/// Stack instance examples into one batched network input.
///
/// # Returns
///
/// `None` when there is no example, meaning there is nothing to infer.
///
/// # Errors
///
/// Fails if the crops do not share one size.
pub fn concat_examples(examples: &[InstanceExample]) -> Result<Option<PoseInput>, PoseError> {
    if examples.is_empty() {
        return Ok(None);
    }

    let class_id = Tensor1::from_shape_vec(
        [examples.len()],
        examples.iter().map(|e| e.class_id).collect(),
    )?;
    let rgb = Tensor4::stack(
        &examples
            .iter()
            .map(|e| e.rgb.0.clone())
            .collect::<Vec<_>>(),
    )?;
    let pcd = Tensor4::stack(
        &examples
            .iter()
            .map(|e| e.pcd.0.clone())
            .collect::<Vec<_>>(),
    )?;

    Ok(Some(PoseInput { class_id, rgb, pcd }))
}
