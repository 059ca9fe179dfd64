use crate::{interpolation::InterpolationMode, resize::resize_native};
use objpose_image::{Image, ImageDtype, ImageError, ImageSize};

/// Place an image at the center of a fixed size canvas.
///
/// Images that fit into the canvas are copied verbatim. Larger images are first scaled
/// down, preserving the aspect ratio, so that they fit into the canvas along their
/// longer side. Pixels of the canvas not covered by the image are set to `fill`.
///
/// # Arguments
///
/// * `src` - The image to place.
/// * `size` - The size of the canvas.
/// * `fill` - The value of the padding pixels.
/// * `interpolation` - The interpolation used when `src` must be scaled down.
///
/// # Examples
///
/// ```
/// use objpose_image::{Image, ImageSize};
/// use objpose_imgproc::centerize::centerize;
/// use objpose_imgproc::interpolation::InterpolationMode;
///
/// let patch = Image::<u8, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 9).unwrap();
/// let canvas = centerize(&patch, ImageSize { width: 4, height: 4 }, 0, InterpolationMode::Nearest).unwrap();
///
/// #[rustfmt::skip]
/// assert_eq!(canvas.as_slice(), &[
///     0, 0, 0, 0,
///     0, 9, 9, 0,
///     0, 9, 9, 0,
///     0, 0, 0, 0,
/// ]);
/// ```
pub fn centerize<T, const C: usize>(
    src: &Image<T, C>,
    size: ImageSize,
    fill: T,
    interpolation: InterpolationMode,
) -> Result<Image<T, C>, ImageError>
where
    T: ImageDtype,
{
    let mut canvas = Image::from_size_val(size, fill)?;
    if src.size().area() == 0 || size.area() == 0 {
        return Ok(canvas);
    }

    if src.cols() <= size.width && src.rows() <= size.height {
        paste(src, &mut canvas);
        return Ok(canvas);
    }

    let scale = f32::min(
        size.width as f32 / src.cols() as f32,
        size.height as f32 / src.rows() as f32,
    );
    let scaled_size = ImageSize {
        width: ((src.cols() as f32 * scale).round() as usize).clamp(1, size.width),
        height: ((src.rows() as f32 * scale).round() as usize).clamp(1, size.height),
    };

    let mut scaled = Image::from_size_val(scaled_size, fill)?;
    resize_native(src, &mut scaled, interpolation)?;
    paste(&scaled, &mut canvas);

    Ok(canvas)
}

// copies `src` into the middle of `dst`, which must be at least as large
fn paste<T: Copy, const C: usize>(src: &Image<T, C>, dst: &mut Image<T, C>) {
    let off_y = (dst.rows() - src.rows()) / 2;
    let off_x = (dst.cols() - src.cols()) / 2;
    let (src_cols, dst_cols) = (src.cols(), dst.cols());
    let row_len = src_cols * C;

    let dst_data = dst.as_slice_mut();
    for (y, src_row) in src.as_slice().chunks_exact(row_len).enumerate() {
        let start = ((off_y + y) * dst_cols + off_x) * C;
        dst_data[start..start + row_len].copy_from_slice(src_row);
    }
}
