use std::collections::{BTreeMap, BTreeSet};

use objpose_image::{Image, ImageError, Mask};

/// The mask of one object instance and its voted class.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceMask {
    /// Instance id in the instance label map.
    pub instance_id: i32,
    /// Most frequent class id under the mask.
    pub class_id: i32,
    /// Pixels of the instance.
    pub mask: Mask,
}

/// Sorted distinct instance ids of a label map, background (negative ids) excluded.
pub fn instance_ids(label_ins: &Image<i32, 1>) -> Vec<i32> {
    label_ins
        .as_slice()
        .iter()
        .copied()
        .filter(|&id| id >= 0)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Majority vote of the class labels covered by `mask`.
///
/// Ties go to the smallest label. Returns `None` for an empty mask.
///
/// # Examples
///
/// ```
/// use objpose_image::{Image, ImageSize, Mask};
/// use objpose_dnn::instance::majority_class;
///
/// let size = ImageSize { width: 4, height: 1 };
/// let labels = Image::<i32, 1>::new(size, vec![7, 3, 7, 3]).unwrap();
/// let mask = Mask::from_size_val(size, true).unwrap();
///
/// assert_eq!(majority_class(&labels, &mask).unwrap(), Some(3));
/// ```
pub fn majority_class(label_cls: &Image<i32, 1>, mask: &Mask) -> Result<Option<i32>, ImageError> {
    check_same_size(label_cls, mask)?;

    let mut counts = BTreeMap::<i32, usize>::new();
    for (&label, _) in label_cls
        .as_slice()
        .iter()
        .zip(mask.as_slice())
        .filter(|(_, &m)| m)
    {
        *counts.entry(label).or_default() += 1;
    }

    // ascending label order, strict comparison keeps the first maximum
    let mut best: Option<(i32, usize)> = None;
    for (label, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }
    Ok(best.map(|(label, _)| label))
}

/// Split an instance label map into per-instance masks with their voted class.
///
/// # Arguments
///
/// * `label_ins` - Dense instance ids, negative for background.
/// * `label_cls` - Dense class ids.
/// * `min_pixels` - Instances with fewer pixels are dropped.
///
/// # Returns
///
/// The surviving instances in ascending instance id order.
pub fn instance_masks(
    label_ins: &Image<i32, 1>,
    label_cls: &Image<i32, 1>,
    min_pixels: usize,
) -> Result<Vec<InstanceMask>, ImageError> {
    check_same_size(label_ins, label_cls)?;

    let mut instances = Vec::new();
    for instance_id in instance_ids(label_ins) {
        let mask = Mask::from_predicate(label_ins, |&id| id == instance_id);
        if mask.count() < min_pixels {
            log::debug!(
                "skipping instance {} with {} pixels",
                instance_id,
                mask.count()
            );
            continue;
        }
        let Some(class_id) = majority_class(label_cls, &mask)? else {
            continue;
        };
        instances.push(InstanceMask {
            instance_id,
            class_id,
            mask,
        });
    }
    Ok(instances)
}

fn check_same_size<T, U>(a: &Image<T, 1>, b: &Image<U, 1>) -> Result<(), ImageError> {
    if a.size() != b.size() {
        return Err(ImageError::InvalidImageSize(
            a.cols(),
            a.rows(),
            b.cols(),
            b.rows(),
        ));
    }
    Ok(())
}
