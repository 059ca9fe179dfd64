use objpose_image::{Image, ImageDtype};

/// Kernel for bilinear interpolation
///
/// PRECONDITION: the image is not empty.
pub(crate) fn bilinear_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
) -> [f32; C] {
    let (rows, cols) = (image.rows(), image.cols());

    let u = u.clamp(0.0, (cols - 1) as f32);
    let v = v.clamp(0.0, (rows - 1) as f32);

    let iu0 = u.trunc() as usize;
    let iv0 = v.trunc() as usize;

    let frac_u = u.fract();
    let frac_v = v.fract();

    let w00 = (1.0 - frac_u) * (1.0 - frac_v);
    let w01 = frac_u * (1.0 - frac_v);
    let w10 = (1.0 - frac_u) * frac_v;
    let w11 = frac_u * frac_v;

    let iu1 = (iu0 + 1).min(cols - 1);
    let iv1 = (iv0 + 1).min(rows - 1);

    let data = image.as_slice();
    let p00 = &data[(iv0 * cols + iu0) * C..][..C];
    let p01 = &data[(iv0 * cols + iu1) * C..][..C];
    let p10 = &data[(iv1 * cols + iu0) * C..][..C];
    let p11 = &data[(iv1 * cols + iu1) * C..][..C];

    let mut pixel = [0.0; C];
    for (k, out) in pixel.iter_mut().enumerate() {
        *out = p00[k].to_f32() * w00
            + p01[k].to_f32() * w01
            + p10[k].to_f32() * w10
            + p11[k].to_f32() * w11;
    }
    pixel
}
