use objpose_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

use crate::camera::PinholeCamera;

/// Reconstruct an organized point cloud from a depth map.
///
/// Every pixel (u, v) with depth `d` becomes the point
/// `((u - cx) * d / fx, (v - cy) * d / fy, d)`. Pixels with NaN depth produce a NaN point,
/// never a point at the camera origin.
///
/// # Arguments
///
/// * `depth` - Depth map in meters, NaN where invalid.
/// * `fx`, `fy` - Focal lengths in pixels.
/// * `cx`, `cy` - Principal point in pixels.
///
/// # Returns
///
/// A 3 channel image with the (X, Y, Z) coordinates of every pixel.
///
/// # Examples
///
/// ```
/// use objpose_image::{Image, ImageSize};
/// use objpose_3d::pointcloud::pointcloud_from_depth;
///
/// let depth = Image::<f32, 1>::new(ImageSize { width: 2, height: 1 }, vec![2.0, f32::NAN]).unwrap();
/// let pcd = pointcloud_from_depth(&depth, 1.0, 1.0, 0.0, 0.0).unwrap();
///
/// assert_eq!(pcd.pixel(0, 0).unwrap(), &[0.0, 0.0, 2.0]);
/// assert!(pcd.pixel(1, 0).unwrap().iter().all(|v| v.is_nan()));
/// ```
pub fn pointcloud_from_depth(
    depth: &Image<f32, 1>,
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
) -> Result<Image<f32, 3>, ImageError> {
    let mut pcd = Image::from_size_val(depth.size(), f32::NAN)?;
    let cols = depth.cols();
    if cols == 0 {
        return Ok(pcd);
    }

    pcd.as_slice_mut()
        .par_chunks_exact_mut(cols * 3)
        .zip(depth.as_slice().par_chunks_exact(cols))
        .enumerate()
        .for_each(|(v, (pcd_row, depth_row))| {
            let y_factor = (v as f64 - cy) / fy;
            pcd_row
                .chunks_exact_mut(3)
                .zip(depth_row)
                .enumerate()
                .for_each(|(u, (point, &d))| {
                    let d64 = d as f64;
                    point[0] = ((u as f64 - cx) * d64 / fx) as f32;
                    point[1] = (y_factor * d64) as f32;
                    point[2] = d;
                });
        });

    Ok(pcd)
}

impl PinholeCamera {
    /// Reconstruct the organized point cloud seen by this camera.
    ///
    /// See [`pointcloud_from_depth`].
    pub fn pointcloud(&self, depth: &Image<f32, 1>) -> Result<Image<f32, 3>, ImageError> {
        pointcloud_from_depth(depth, self.fx, self.fy, self.cx, self.cy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use objpose_image::ImageSize;

    #[test]
    fn nan_exactly_where_depth_is_nan() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 4,
        };
        let depth = Image::<f32, 1>::from_fn(size, |x, y| {
            if (x + 2 * y) % 3 == 0 {
                [f32::NAN]
            } else {
                [0.5 + x as f32]
            }
        });
        let pcd = pointcloud_from_depth(&depth, 525.0, 525.0, 2.0, 1.5)?;

        for y in 0..size.height {
            for x in 0..size.width {
                let d = depth.get_pixel(x, y, 0)?;
                let p = pcd.pixel(x, y)?;
                if d.is_nan() {
                    assert!(p.iter().all(|v| v.is_nan()));
                } else {
                    assert!(p.iter().all(|v| !v.is_nan()));
                }
            }
        }
        Ok(())
    }

    #[test]
    fn uniform_depth_is_linear() -> Result<(), ImageError> {
        let (fx, fy, cx, cy) = (500.0, 400.0, 3.0, 2.0);
        let d = 1.25f32;
        let depth = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 7,
                height: 5,
            },
            d,
        )?;
        let pcd = PinholeCamera::new(fx, fy, cx, cy).pointcloud(&depth)?;

        for y in 0..5 {
            for x in 0..7 {
                let p = pcd.pixel(x, y)?;
                assert_eq!(p[2], d);
                assert_relative_eq!(p[0], ((x as f64 - cx) * d as f64 / fx) as f32);
                assert_relative_eq!(p[1], ((y as f64 - cy) * d as f64 / fy) as f32);
            }
        }
        // principal point maps onto the optical axis
        assert_eq!(pcd.pixel(3, 2)?, &[0.0, 0.0, d]);
        Ok(())
    }
}
