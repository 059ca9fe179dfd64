use objpose_image::{Image, ImageError, Mask};
use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Overwrite every pixel not covered by `mask` with `value`, in place.
///
/// # Arguments
///
/// * `image` - The image to modify.
/// * `mask` - The mask of pixels to keep, with the same size as `image`.
/// * `value` - The value written to every channel of the discarded pixels.
///
/// # Examples
///
/// ```
/// use objpose_image::{Image, ImageSize, Mask};
/// use objpose_imgproc::mask::fill_outside_mask;
///
/// let size = ImageSize { width: 2, height: 1 };
/// let mut image = Image::<u8, 3>::from_size_val(size, 7).unwrap();
/// let mask = Mask::new(size, vec![true, false]).unwrap();
///
/// fill_outside_mask(&mut image, &mask, 0).unwrap();
///
/// assert_eq!(image.as_slice(), &[7, 7, 7, 0, 0, 0]);
/// ```
pub fn fill_outside_mask<T, const C: usize>(
    image: &mut Image<T, C>,
    mask: &Mask,
    value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if image.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            image.cols(),
            image.rows(),
            mask.cols(),
            mask.rows(),
        ));
    }

    image
        .as_slice_mut()
        .par_chunks_exact_mut(C)
        .zip(mask.as_slice().par_iter())
        .filter(|(_, &keep)| !keep)
        .for_each(|(pixel, _)| pixel.fill(value));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use objpose_image::ImageSize;

    #[test]
    fn fill_nan_outside() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let mut pcd = Image::<f32, 3>::from_size_val(size, 1.0)?;
        let mask = Mask::new(size, vec![false, true, true, false])?;
        fill_outside_mask(&mut pcd, &mask, f32::NAN)?;

        let nan = pcd.as_slice().iter().map(|v| v.is_nan()).collect::<Vec<_>>();
        assert_eq!(
            nan,
            vec![true, true, true, false, false, false, false, false, false, true, true, true]
        );
        Ok(())
    }

    #[test]
    fn fill_size_mismatch() -> Result<(), ImageError> {
        let mut image = Image::<u8, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0)?;
        let mask = Mask::from_size_val(ImageSize { width: 1, height: 2 }, true)?;
        assert!(fill_outside_mask(&mut image, &mask, 0).is_err());
        Ok(())
    }
}
