use objpose_image::Image;
use objpose_io::Detections;

use crate::error::PoseError;

/// An instance segmentation model.
pub trait InstanceSegmenter {
    /// Detect the object instances of an RGB image.
    fn segment(&self, rgb: &Image<u8, 3>) -> Result<Detections, PoseError>;
}

/// Keep the detections scoring at least `threshold`, preserving their order.
pub fn filter_by_score(detections: Detections, threshold: f32) -> Detections {
    let mut out = Detections::default();
    for ((mask, label), score) in detections
        .masks
        .into_iter()
        .zip(detections.labels)
        .zip(detections.scores)
    {
        if score >= threshold {
            out.masks.push(mask);
            out.labels.push(label);
            out.scores.push(score);
        }
    }
    out
}

/// Convert raw segmenter labels into foreground class indices.
///
/// # Errors
///
/// Returns [`PoseError::SegmentationError`] for a negative or out of range label.
pub fn foreground_labels(raw: &[i64]) -> Result<Vec<u32>, PoseError> {
    raw.iter()
        .map(|&l| {
            u32::try_from(l)
                .map_err(|_| PoseError::SegmentationError(format!("invalid label {}", l)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use objpose_image::{ImageSize, Mask};

    #[test]
    fn filter_keeps_confident() -> Result<(), PoseError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let detections = Detections {
            masks: vec![Mask::from_size_val(size, true)?; 3],
            labels: vec![1, 2, 3],
            scores: vec![0.9, 0.1, 0.5],
        };
        let kept = filter_by_score(detections, 0.5);
        assert_eq!(kept.labels, vec![1, 3]);
        assert_eq!(kept.scores, vec![0.9, 0.5]);
        assert_eq!(kept.masks.len(), 2);
        Ok(())
    }

    #[test]
    fn negative_label_is_rejected() -> Result<(), PoseError> {
        assert_eq!(foreground_labels(&[0, 4, 20])?, vec![0, 4, 20]);
        assert!(matches!(
            foreground_labels(&[3, -1]),
            Err(PoseError::SegmentationError(_))
        ));
        Ok(())
    }
}
