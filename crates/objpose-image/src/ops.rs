use crate::{error::ImageError, Image};

/// Cast the pixel data of an image to a different type and scale it.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image, with the same size as `src`.
/// * `scale` - The factor applied after the cast.
///
/// # Examples
///
/// ```
/// use objpose_image::{ops, Image, ImageSize};
///
/// let src = Image::<u16, 1>::new(ImageSize { width: 2, height: 1 }, vec![0, 3]).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0).unwrap();
///
/// ops::cast_and_scale(&src, &mut dst, 0.5).unwrap();
///
/// assert_eq!(dst.as_slice(), &[0.0, 1.5]);
/// ```
pub fn cast_and_scale<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: U,
) -> Result<(), ImageError>
where
    T: Copy + num_traits::NumCast,
    U: Copy + num_traits::NumCast + std::ops::Mul<Output = U>,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .try_for_each(|(out, &inp)| {
            let x = U::from(inp).ok_or(ImageError::CastError)?;
            *out = x * scale;
            Ok::<(), ImageError>(())
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageSize;

    #[test]
    fn cast_and_scale_u8_f32() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::new(ImageSize { width: 1, height: 1 }, vec![0, 2, 255])?;
        let mut dst = Image::<f32, 3>::from_size_val(src.size(), 0.0)?;
        cast_and_scale(&src, &mut dst, 0.5)?;
        assert_eq!(dst.as_slice(), &[0.0, 1.0, 127.5]);
        Ok(())
    }

    #[test]
    fn cast_and_scale_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val(ImageSize { width: 2, height: 1 }, 0)?;
        let mut dst = Image::<f32, 1>::from_size_val(ImageSize { width: 1, height: 2 }, 0.0)?;
        assert!(cast_and_scale(&src, &mut dst, 1.0).is_err());
        Ok(())
    }
}
