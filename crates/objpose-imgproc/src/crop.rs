use crate::bbox::PixelBox;
use objpose_image::{Image, ImageError, ImageSize};

/// Copy the pixels covered by a box into a new image.
///
/// # Arguments
///
/// * `src` - The image to crop.
/// * `bbox` - The region, with exclusive bottom and right bounds.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the box does not lie inside `src`.
///
/// # Examples
///
/// ```rust
/// use objpose_image::{Image, ImageSize};
/// use objpose_imgproc::{bbox::PixelBox, crop::crop_box};
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, (0u8..16).collect()).unwrap();
/// let bbox = PixelBox { y1: 1, x1: 1, y2: 3, x2: 3 };
///
/// let cropped = crop_box(&image, &bbox).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_box<T: Copy, const C: usize>(
    src: &Image<T, C>,
    bbox: &PixelBox,
) -> Result<Image<T, C>, ImageError> {
    if bbox.x1 > bbox.x2 || bbox.y1 > bbox.y2 || bbox.x2 > src.cols() || bbox.y2 > src.rows() {
        return Err(ImageError::InvalidImageSize(
            bbox.x2,
            bbox.y2,
            src.cols(),
            src.rows(),
        ));
    }

    let size = ImageSize {
        width: bbox.width(),
        height: bbox.height(),
    };
    let mut data = Vec::with_capacity(size.area() * C);
    if size.area() > 0 {
        src.as_slice()
            .chunks_exact(src.cols() * C)
            .skip(bbox.y1)
            .take(size.height)
            .for_each(|row| data.extend_from_slice(&row[bbox.x1 * C..bbox.x2 * C]));
    }

    Image::new(size, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_rgb() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<_, 3>::new(
            ImageSize { width: 2, height: 3 },
            vec![
                0u8, 1, 2, 3, 4, 5,
                6u8, 7, 8, 9, 10, 11,
                12u8, 13, 14, 15, 16, 17,
            ],
        )?;

        let cropped = crop_box(&image, &PixelBox { y1: 1, x1: 1, y2: 3, x2: 2 })?;

        assert_eq!(cropped.size(), ImageSize { width: 1, height: 2 });
        assert_eq!(cropped.as_slice(), &[9u8, 10, 11, 15, 16, 17]);
        Ok(())
    }

    #[test]
    fn crop_outside_fails() -> Result<(), ImageError> {
        let image = Image::<f32, 3>::from_size_val(ImageSize { width: 4, height: 4 }, 0.0)?;
        let bbox = PixelBox { y1: 0, x1: 2, y2: 3, x2: 5 };
        assert!(crop_box(&image, &bbox).is_err());
        Ok(())
    }

    #[test]
    fn empty_box() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(ImageSize { width: 4, height: 4 }, 1)?;
        let cropped = crop_box(&image, &PixelBox { y1: 2, x1: 2, y2: 2, x2: 4 })?;
        assert_eq!(cropped.size().area(), 0);
        Ok(())
    }
}
