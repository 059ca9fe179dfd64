use crate::interpolation::{interpolate_pixel, InterpolationMode};
use objpose_image::{Image, ImageDtype, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Resize an image to the size of `dst`.
///
/// Pixel centers are aligned between the two images: the destination pixel `x` samples
/// the source at `(x + 0.5) * src_w / dst_w - 0.5`.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container, already allocated with the target size.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use objpose_image::{Image, ImageSize};
/// use objpose_imgproc::resize::resize_native;
/// use objpose_imgproc::interpolation::InterpolationMode;
///
/// let image = Image::<_, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0f32; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
///
/// let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0.0).unwrap();
///
/// resize_native(
///     &image,
///     &mut image_resized,
///     InterpolationMode::Nearest,
/// )
/// .unwrap();
///
/// assert_eq!(image_resized.num_channels(), 3);
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
pub fn resize_native<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError>
where
    T: ImageDtype,
{
    if src.size().area() == 0 || dst.size().area() == 0 {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let scale_x = src.cols() as f32 / dst.cols() as f32;
    let scale_y = src.rows() as f32 / dst.rows() as f32;
    let dst_cols = dst.cols();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let v = (y as f32 + 0.5) * scale_y - 0.5;
            dst_row
                .chunks_exact_mut(C)
                .enumerate()
                .for_each(|(x, out)| {
                    let u = (x as f32 + 0.5) * scale_x - 0.5;
                    let pixel = interpolate_pixel(src, u, v, interpolation);
                    for (o, p) in out.iter_mut().zip(pixel) {
                        *o = T::from_f32(p);
                    }
                });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use objpose_image::ImageSize;

    #[test]
    fn resize_nearest_downscale() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<f32, 1>::new(ImageSize { width: 4, height: 2 }, vec![
            0.0, 1.0, 2.0, 3.0,
            4.0, 5.0, 6.0, 7.0,
        ])?;
        let mut resized = Image::<f32, 1>::from_size_val(ImageSize { width: 2, height: 1 }, 0.0)?;
        resize_native(&image, &mut resized, InterpolationMode::Nearest)?;
        // samples land on (0.5, 0.5) and (2.5, 0.5), rounded away from zero
        assert_eq!(resized.as_slice(), &[5.0, 7.0]);
        Ok(())
    }

    #[test]
    fn resize_nearest_keeps_nan() -> Result<(), ImageError> {
        let image = Image::<f32, 3>::from_fn(ImageSize { width: 4, height: 4 }, |x, _| {
            if x < 2 {
                [f32::NAN; 3]
            } else {
                [1.0, 2.0, 3.0]
            }
        });
        let mut resized = Image::<f32, 3>::from_size_val(ImageSize { width: 2, height: 2 }, 0.0)?;
        resize_native(&image, &mut resized, InterpolationMode::Nearest)?;
        for px in resized.as_slice().chunks_exact(3) {
            let all_nan = px.iter().all(|v| v.is_nan());
            let all_valid = px == [1.0, 2.0, 3.0];
            assert!(all_nan || all_valid);
        }
        Ok(())
    }

    #[test]
    fn resize_bilinear_constant() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(ImageSize { width: 9, height: 7 }, 100)?;
        let mut resized = Image::<u8, 3>::from_size_val(ImageSize { width: 4, height: 3 }, 0)?;
        resize_native(&image, &mut resized, InterpolationMode::Bilinear)?;
        assert!(resized.as_slice().iter().all(|&v| v == 100));
        Ok(())
    }

    #[test]
    fn resize_bilinear_upscale() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![0.0, 10.0],
        )?;
        let mut resized = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 1,
            },
            0.0,
        )?;
        resize_native(&image, &mut resized, InterpolationMode::Bilinear)?;
        for (&v, expected) in resized.as_slice().iter().zip([0.0, 2.5, 7.5, 10.0]) {
            approx::assert_relative_eq!(v, expected, epsilon = 1e-5);
        }
        Ok(())
    }

    #[test]
    fn resize_empty_fails() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(ImageSize { width: 0, height: 3 }, 0)?;
        let mut resized = Image::<u8, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0)?;
        assert!(resize_native(&image, &mut resized, InterpolationMode::Nearest).is_err());
        Ok(())
    }
}
