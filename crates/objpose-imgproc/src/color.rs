use crate::{bbox::mask_to_bbox, draw::draw_box};
use objpose_image::{Image, ImageError, Mask};

/// Generate the PASCAL VOC style label colormap with `n` entries.
///
/// Entry 0 is black; consecutive labels get well separated colors.
///
/// ```
/// use objpose_imgproc::color::label_colormap;
///
/// let cmap = label_colormap(3);
/// assert_eq!(cmap, vec![[0, 0, 0], [128, 0, 0], [0, 128, 0]]);
/// ```
pub fn label_colormap(n: usize) -> Vec<[u8; 3]> {
    (0..n)
        .map(|i| {
            let mut id = i;
            let mut color = [0u8; 3];
            for j in 0..8 {
                for (c, value) in color.iter_mut().enumerate() {
                    *value |= (((id >> c) & 1) as u8) << (7 - j);
                }
                id >>= 3;
            }
            color
        })
        .collect()
}

fn blend(base: &[u8], color: &[u8; 3], alpha: f32) -> [u8; 3] {
    let mut out = [0u8; 3];
    for k in 0..3 {
        let v = (1.0 - alpha) * base[k] as f32 + alpha * color[k] as f32;
        out[k] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Overlay a dense label map on an RGB image.
///
/// Negative labels are treated as unlabeled and keep the original pixel. A label `l >= 0`
/// is blended with the colormap entry `l + 1`, so the black entry is never used.
///
/// This differs from blending every pixel of `l + 1` with the colormap: background pixels
/// are left as they are instead of being darkened toward black.
///
/// # Arguments
///
/// * `labels` - The label map, same size as `rgb`.
/// * `rgb` - The image to draw on.
/// * `alpha` - Weight of the label color in the blend.
pub fn label_to_rgb(
    labels: &Image<i32, 1>,
    rgb: &Image<u8, 3>,
    alpha: f32,
) -> Result<Image<u8, 3>, ImageError> {
    if labels.size() != rgb.size() {
        return Err(ImageError::InvalidImageSize(
            labels.cols(),
            labels.rows(),
            rgb.cols(),
            rgb.rows(),
        ));
    }

    let max_label = labels.as_slice().iter().copied().max().unwrap_or(-1).max(0) as usize;
    let cmap = label_colormap(max_label + 2);

    let mut out = rgb.clone();
    out.as_slice_mut()
        .chunks_exact_mut(3)
        .zip(labels.as_slice())
        .filter(|(_, &label)| label >= 0)
        .for_each(|(px, &label)| {
            let color = blend(px, &cmap[label as usize + 1], alpha);
            px.copy_from_slice(&color);
        });

    Ok(out)
}

/// Draw instance masks and their bounding boxes over an RGB image.
///
/// Each instance is colored by its class label: the mask is blended with the label color
/// and the mask's bounding box is outlined with `line_width`. Empty masks are skipped.
///
/// No `"{id:02}: {class_name}"` caption is drawn next to the boxes, since this crate
/// does not render text.
pub fn instances_to_rgb(
    rgb: &Image<u8, 3>,
    labels: &[u32],
    masks: &[Mask],
    line_width: usize,
) -> Result<Image<u8, 3>, ImageError> {
    let max_label = labels.iter().copied().max().unwrap_or(0) as usize;
    let cmap = label_colormap(max_label + 1);

    let mut out = rgb.clone();
    for (&label, mask) in labels.iter().zip(masks) {
        if mask.size() != rgb.size() {
            return Err(ImageError::InvalidImageSize(
                mask.cols(),
                mask.rows(),
                rgb.cols(),
                rgb.rows(),
            ));
        }
        let color = cmap[label as usize];

        out.as_slice_mut()
            .chunks_exact_mut(3)
            .zip(mask.as_slice())
            .filter(|(_, &m)| m)
            .for_each(|(px, _)| {
                let blended = blend(px, &color, 0.5);
                px.copy_from_slice(&blended);
            });

        let bbox = match mask_to_bbox(mask) {
            Ok(bbox) => bbox.round(),
            Err(ImageError::EmptyMask) => continue,
            Err(e) => return Err(e),
        };
        draw_box(&mut out, &bbox, color, line_width);
    }

    Ok(out)
}
