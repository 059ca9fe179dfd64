use objpose_image::{Image, ImageDtype};

/// Kernel for nearest neighbor interpolation
///
/// PRECONDITION: the image is not empty.
pub(crate) fn nearest_neighbor_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
) -> [f32; C] {
    let (rows, cols) = (image.rows(), image.cols());

    let iu = (u.round().max(0.0) as usize).min(cols - 1);
    let iv = (v.round().max(0.0) as usize).min(rows - 1);

    let base = (iv * cols + iu) * C;
    let src = &image.as_slice()[base..base + C];

    let mut pixel = [0.0; C];
    for (dst, &val) in pixel.iter_mut().zip(src) {
        *dst = val.to_f32();
    }
    pixel
}
