use objpose_image::{ops, Image, ImageError};
use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};

/// Convert a 16-bit depth map in millimeters into meters.
///
/// Zero readings carry no measurement and become NaN.
///
/// ```
/// use objpose_image::{Image, ImageSize};
/// use objpose_3d::depth::depth_from_millimeters;
///
/// let raw = Image::<u16, 1>::new(ImageSize { width: 2, height: 1 }, vec![0, 1500]).unwrap();
/// let depth = depth_from_millimeters(&raw).unwrap();
///
/// assert!(depth.as_slice()[0].is_nan());
/// assert_eq!(depth.as_slice()[1], 1.5);
/// ```
pub fn depth_from_millimeters(raw: &Image<u16, 1>) -> Result<Image<f32, 1>, ImageError> {
    let mut depth = Image::from_size_val(raw.size(), 0.0f32)?;
    ops::cast_and_scale(raw, &mut depth, 1.0)?;
    depth.as_slice_mut().par_iter_mut().for_each(|d| {
        *d = if *d == 0.0 { f32::NAN } else { *d / 1000.0 };
    });
    Ok(depth)
}

/// Mark zero, negative and non-finite depth readings as NaN, in place.
pub fn sanitize_depth(depth: &mut Image<f32, 1>) {
    depth.as_slice_mut().par_iter_mut().for_each(|d| {
        if !d.is_finite() || *d <= 0.0 {
            *d = f32::NAN;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use objpose_image::ImageSize;

    #[test]
    fn sanitize_invalid_readings() -> Result<(), ImageError> {
        let mut depth = Image::<f32, 1>::new(
            ImageSize {
                width: 5,
                height: 1,
            },
            vec![0.0, -1.0, f32::INFINITY, 0.7, f32::NAN],
        )?;
        sanitize_depth(&mut depth);
        let valid = depth.as_slice().iter().map(|d| !d.is_nan()).collect::<Vec<_>>();
        assert_eq!(valid, vec![false, false, false, true, false]);
        assert_eq!(depth.as_slice()[3], 0.7);
        Ok(())
    }
}
