use serde::{Deserialize, Serialize};

/// Intrinsic parameters of a pinhole camera, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinholeCamera {
    /// Focal length along x.
    pub fx: f64,
    /// Focal length along y.
    pub fy: f64,
    /// Principal point x coordinate.
    pub cx: f64,
    /// Principal point y coordinate.
    pub cy: f64,
}

impl PinholeCamera {
    /// Creates a camera from its focal lengths and principal point.
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Creates a camera from a row-major 3x3 camera matrix `K`.
    ///
    /// ```
    /// use objpose_3d::camera::PinholeCamera;
    ///
    /// let k = [500.0, 0.0, 320.0, 0.0, 510.0, 240.0, 0.0, 0.0, 1.0];
    /// let camera = PinholeCamera::from_k(&k);
    /// assert_eq!(camera, PinholeCamera::new(500.0, 510.0, 320.0, 240.0));
    /// ```
    pub fn from_k(k: &[f64; 9]) -> Self {
        Self {
            fx: k[0],
            fy: k[4],
            cx: k[2],
            cy: k[5],
        }
    }

    /// Returns the camera matrix as a 3x3 array.
    pub fn camera_matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.fx, 0.0, self.cx],
            [0.0, self.fy, self.cy],
            [0.0, 0.0, 1.0],
        ]
    }

    /// Back-project pixel (u, v) at the given depth into the camera frame.
    #[inline]
    pub fn unproject(&self, u: f64, v: f64, depth: f64) -> [f64; 3] {
        [
            (u - self.cx) * depth / self.fx,
            (v - self.cy) * depth / self.fy,
            depth,
        ]
    }

    /// Project a point in the camera frame to pixel coordinates.
    #[inline]
    pub fn project(&self, point: &[f64; 3]) -> [f64; 2] {
        [
            self.fx * point[0] / point[2] + self.cx,
            self.fy * point[1] / point[2] + self.cy,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn project_unproject() {
        let camera = PinholeCamera::new(600.0, 610.0, 320.0, 240.0);
        let p = camera.unproject(100.0, 50.0, 2.0);
        let uv = camera.project(&p);
        assert_relative_eq!(uv[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(uv[1], 50.0, epsilon = 1e-9);
        assert_relative_eq!(p[2], 2.0);
    }

    #[test]
    fn camera_matrix_roundtrip() {
        let camera = PinholeCamera::new(1.0, 2.0, 3.0, 4.0);
        let k = camera.camera_matrix();
        let flat = [
            k[0][0], k[0][1], k[0][2], k[1][0], k[1][1], k[1][2], k[2][0], k[2][1], k[2][2],
        ];
        assert_eq!(PinholeCamera::from_k(&flat), camera);
    }

    #[test]
    fn deserialize_camera() -> Result<(), serde_json::Error> {
        let camera: PinholeCamera =
            serde_json::from_str(r#"{"fx": 1066.778, "fy": 1067.487, "cx": 312.987, "cy": 241.311}"#)?;
        assert_relative_eq!(camera.fx, 1066.778);
        Ok(())
    }
}
