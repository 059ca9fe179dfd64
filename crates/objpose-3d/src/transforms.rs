use crate::error::GeometryError;

/// Compute the rotation matrix of a quaternion given as (w, x, y, z).
///
/// The quaternion is normalized first.
///
/// # Errors
///
/// Fails for a zero quaternion.
///
/// Example:
///
/// ```
/// use objpose_3d::transforms::quaternion_to_rotation_matrix;
///
/// let rotation = quaternion_to_rotation_matrix(&[1.0, 0.0, 0.0, 0.0]).unwrap();
/// assert_eq!(rotation, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
/// ```
pub fn quaternion_to_rotation_matrix(q: &[f64; 4]) -> Result<[[f64; 3]; 3], GeometryError> {
    let norm = q.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm < 1e-10 {
        return Err(GeometryError::DegenerateRotation("quaternion"));
    }
    let (w, x, y, z) = (q[0] / norm, q[1] / norm, q[2] / norm, q[3] / norm);

    Ok([
        [
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y - w * z),
            2.0 * (x * z + w * y),
        ],
        [
            2.0 * (x * y + w * z),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z - w * x),
        ],
        [
            2.0 * (x * z - w * y),
            2.0 * (y * z + w * x),
            1.0 - 2.0 * (x * x + y * y),
        ],
    ])
}

/// Reorder a (w, x, y, z) quaternion into (x, y, z, w).
#[inline]
pub fn wxyz_to_xyzw(q: &[f64; 4]) -> [f64; 4] {
    [q[1], q[2], q[3], q[0]]
}

/// Reorder a (x, y, z, w) quaternion into (w, x, y, z).
#[inline]
pub fn xyzw_to_wxyz(q: &[f64; 4]) -> [f64; 4] {
    [q[3], q[0], q[1], q[2]]
}

/// Compute the (w, x, y, z) quaternion of a rotation of `angle` radians around `axis`.
///
/// # Errors
///
/// Fails for a zero axis.
pub fn axis_angle_to_quaternion(axis: &[f64; 3], angle: f64) -> Result<[f64; 4], GeometryError> {
    let magnitude = axis.iter().map(|v| v * v).sum::<f64>().sqrt();
    if magnitude < 1e-10 {
        return Err(GeometryError::DegenerateRotation("axis"));
    }
    let (s, c) = (angle / 2.0).sin_cos();
    Ok([
        c,
        s * axis[0] / magnitude,
        s * axis[1] / magnitude,
        s * axis[2] / magnitude,
    ])
}

/// Build the 4x4 homogeneous transform `[R | t; 0 0 0 1]`.
pub fn homogeneous_from_rt(rotation: &[[f64; 3]; 3], translation: &[f64; 3]) -> [[f64; 4]; 4] {
    let mut transform = [[0.0; 4]; 4];
    for i in 0..3 {
        transform[i][..3].copy_from_slice(&rotation[i]);
        transform[i][3] = translation[i];
    }
    transform[3][3] = 1.0;
    transform
}

/// Apply a homogeneous transform to a 3d point.
pub fn transform_point(transform: &[[f64; 4]; 4], point: &[f64; 3]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (i, o) in out.iter_mut().enumerate() {
        *o = transform[i][0] * point[0]
            + transform[i][1] * point[1]
            + transform[i][2] * point[2]
            + transform[i][3];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quaternion_rotation_about_x() -> Result<(), GeometryError> {
        let q = axis_angle_to_quaternion(&[1.0, 0.0, 0.0], std::f64::consts::PI / 2.0)?;
        let rotation = quaternion_to_rotation_matrix(&q)?;
        let expected = [[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]];
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(rotation[i][j], expected[i][j], epsilon = 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn degenerate_inputs() {
        assert!(quaternion_to_rotation_matrix(&[0.0; 4]).is_err());
        assert!(axis_angle_to_quaternion(&[0.0; 3], 1.0).is_err());
    }

    #[test]
    fn quaternion_reordering() {
        let q = [0.1, 0.2, 0.3, 0.4];
        assert_eq!(wxyz_to_xyzw(&q), [0.2, 0.3, 0.4, 0.1]);
        assert_eq!(xyzw_to_wxyz(&wxyz_to_xyzw(&q)), q);
    }

    #[test]
    fn homogeneous_transform() -> Result<(), GeometryError> {
        let rotation = quaternion_to_rotation_matrix(&axis_angle_to_quaternion(
            &[0.0, 0.0, 1.0],
            std::f64::consts::PI / 2.0,
        )?)?;
        let transform = homogeneous_from_rt(&rotation, &[1.0, 2.0, 3.0]);
        assert_eq!(transform[3], [0.0, 0.0, 0.0, 1.0]);

        let p = transform_point(&transform, &[1.0, 0.0, 0.0]);
        assert_relative_eq!(p[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(p[2], 3.0, epsilon = 1e-12);
        Ok(())
    }
}
