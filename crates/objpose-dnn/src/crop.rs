use objpose_image::{Image, ImageError, ImageSize, Mask};
use objpose_imgproc::{
    bbox::mask_to_bbox, centerize::centerize, crop::crop_box, interpolation::InterpolationMode,
    mask::fill_outside_mask,
};

use crate::{config::EstimatorConfig, error::PoseError, instance::instance_masks};

/// Network input of one object instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceExample {
    /// Class id of the instance.
    pub class_id: i32,
    /// Centered RGB crop, zero outside the instance.
    pub rgb: Image<u8, 3>,
    /// Centered point cloud crop, NaN outside the instance.
    pub pcd: Image<f32, 3>,
}

/// Crop one instance out of a frame and center it into a fixed size canvas.
///
/// The crop covers the bounding box of `mask`. RGB pixels outside the mask are zeroed and
/// point cloud pixels outside the mask set to NaN before centering. Crops larger than the
/// canvas are scaled down, bilinear for the RGB and nearest for the point cloud.
///
/// # Arguments
///
/// * `rgb` - The frame color image.
/// * `pcd` - The organized point cloud of the frame.
/// * `mask` - The instance mask.
/// * `class_id` - The class of the instance.
/// * `size` - The canvas size.
///
/// # Errors
///
/// Fails if the images do not share one size or if the mask is empty.
pub fn crop_instance(
    rgb: &Image<u8, 3>,
    pcd: &Image<f32, 3>,
    mask: &Mask,
    class_id: i32,
    size: ImageSize,
) -> Result<InstanceExample, ImageError> {
    for other in [pcd.size(), mask.size()] {
        if other != rgb.size() {
            return Err(ImageError::InvalidImageSize(
                rgb.cols(),
                rgb.rows(),
                other.width,
                other.height,
            ));
        }
    }

    let bbox = mask_to_bbox(mask)?.round();
    let mask_ins = crop_box(mask, &bbox)?;

    let mut rgb_ins = crop_box(rgb, &bbox)?;
    fill_outside_mask(&mut rgb_ins, &mask_ins, 0)?;

    let mut pcd_ins = crop_box(pcd, &bbox)?;
    fill_outside_mask(&mut pcd_ins, &mask_ins, f32::NAN)?;

    Ok(InstanceExample {
        class_id,
        rgb: centerize(&rgb_ins, size, 0, InterpolationMode::Bilinear)?,
        pcd: centerize(&pcd_ins, size, f32::NAN, InterpolationMode::Nearest)?,
    })
}

/// Build the examples of every instance of a frame from dense label maps.
///
/// Instances are visited in ascending instance id order; those with fewer than
/// `config.min_instance_pixels` pixels produce no example.
pub fn examples_from_labels(
    rgb: &Image<u8, 3>,
    pcd: &Image<f32, 3>,
    label_ins: &Image<i32, 1>,
    label_cls: &Image<i32, 1>,
    config: &EstimatorConfig,
) -> Result<Vec<InstanceExample>, PoseError> {
    let size = ImageSize {
        width: config.crop_size,
        height: config.crop_size,
    };
    instance_masks(label_ins, label_cls, config.min_instance_pixels)?
        .iter()
        .map(|ins| Ok(crop_instance(rgb, pcd, &ins.mask, ins.class_id, size)?))
        .collect()
}

/// Build the examples of a set of instance masks and their class ids.
///
/// Masks with fewer than `config.min_instance_pixels` pixels produce no example.
pub fn examples_from_masks(
    rgb: &Image<u8, 3>,
    pcd: &Image<f32, 3>,
    masks: &[Mask],
    class_ids: &[i32],
    config: &EstimatorConfig,
) -> Result<Vec<InstanceExample>, PoseError> {
    if masks.len() != class_ids.len() {
        return Err(PoseError::InvalidOutput(format!(
            "{} masks for {} class ids",
            masks.len(),
            class_ids.len()
        )));
    }
    let size = ImageSize {
        width: config.crop_size,
        height: config.crop_size,
    };
    masks
        .iter()
        .zip(class_ids)
        .filter(|(mask, _)| mask.count() >= config.min_instance_pixels)
        .map(|(mask, &class_id)| Ok(crop_instance(rgb, pcd, mask, class_id, size)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(size: ImageSize) -> (Image<u8, 3>, Image<f32, 3>) {
        let rgb = Image::from_fn(size, |x, y| [x as u8, y as u8, 200]);
        let pcd = Image::from_fn(size, |x, y| [x as f32, y as f32, 1.0]);
        (rgb, pcd)
    }

    #[test]
    fn small_crop_is_copied_verbatim() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 40,
            height: 30,
        };
        let (rgb, pcd) = frame(size);
        // 10 x 6 box at (x=12, y=5) with one hole
        let mask = Mask::from_fn(size, |x, y| {
            [(12..22).contains(&x) && (5..11).contains(&y) && !(x == 13 && y == 6)]
        });

        let canvas = ImageSize {
            width: 256,
            height: 256,
        };
        let example = crop_instance(&rgb, &pcd, &mask, 4, canvas)?;
        assert_eq!(example.class_id, 4);
        assert_eq!(example.rgb.size(), canvas);
        assert_eq!(example.pcd.size(), canvas);

        let (off_y, off_x) = ((256 - 6) / 2, (256 - 10) / 2);
        for y in 0..6 {
            for x in 0..10 {
                let (sx, sy) = (x + 12, y + 5);
                let rgb_px = example.rgb.pixel(off_x + x, off_y + y)?;
                let pcd_px = example.pcd.pixel(off_x + x, off_y + y)?;
                if sx == 13 && sy == 6 {
                    assert_eq!(rgb_px, &[0, 0, 0]);
                    assert!(pcd_px.iter().all(|v| v.is_nan()));
                } else {
                    assert_eq!(rgb_px, rgb.pixel(sx, sy)?);
                    assert_eq!(pcd_px, pcd.pixel(sx, sy)?);
                }
            }
        }

        // padding
        assert_eq!(example.rgb.pixel(0, 0)?, &[0, 0, 0]);
        assert!(example.pcd.pixel(255, 255)?.iter().all(|v| v.is_nan()));
        assert!(example.pcd.pixel(off_x - 1, off_y)?.iter().all(|v| v.is_nan()));
        Ok(())
    }

    #[test]
    fn large_crop_is_scaled_down() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 600,
            height: 300,
        };
        let (rgb, pcd) = frame(size);
        let mask = Mask::from_fn(size, |_, y| [y >= 100]);

        let canvas = ImageSize {
            width: 256,
            height: 256,
        };
        let example = crop_instance(&rgb, &pcd, &mask, 1, canvas)?;
        // 600 x 200 -> 256 x 85, centered vertically
        let valid = example
            .pcd
            .as_slice()
            .chunks_exact(3)
            .filter(|p| !p[2].is_nan())
            .count();
        assert_eq!(valid % 256, 0);
        assert!((85..=86).contains(&(valid / 256)));
        // nearest keeps values from the source
        for p in example.pcd.as_slice().chunks_exact(3).filter(|p| !p[2].is_nan()) {
            assert_eq!(p[2], 1.0);
            assert_eq!(p[0].fract(), 0.0);
        }
        Ok(())
    }

    #[test]
    fn empty_mask_is_an_error() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 8,
            height: 8,
        };
        let (rgb, pcd) = frame(size);
        let mask = Mask::from_size_val(size, false)?;
        assert_eq!(
            crop_instance(&rgb, &pcd, &mask, 0, size),
            Err(ImageError::EmptyMask)
        );
        Ok(())
    }

    #[test]
    fn examples_skip_small_instances() -> Result<(), PoseError> {
        let size = ImageSize {
            width: 64,
            height: 48,
        };
        let (rgb, pcd) = frame(size);
        let label_ins = Image::<i32, 1>::from_fn(size, |x, y| {
            [match (x, y) {
                (0..=9, 0..=9) => 0,
                (20..=29, 20..=29) => 1,
                (40..=44, 40..=41) => 2,
                _ => -1,
            }]
        });
        let label_cls = Image::<i32, 1>::from_fn(size, |x, _| [(x / 20) as i32 + 1]);

        let examples =
            examples_from_labels(&rgb, &pcd, &label_ins, &label_cls, &EstimatorConfig::default())?;
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].class_id, 1);
        assert_eq!(examples[1].class_id, 2);

        let masks = vec![
            Mask::from_predicate(&label_ins, |&v| v == 1),
            Mask::from_predicate(&label_ins, |&v| v == 2),
        ];
        let examples =
            examples_from_masks(&rgb, &pcd, &masks, &[7, 8], &EstimatorConfig::default())?;
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].class_id, 7);
        Ok(())
    }
}
