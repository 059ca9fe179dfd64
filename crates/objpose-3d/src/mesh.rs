use crate::aabb::Aabb;

/// A triangle mesh with shared vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<[f64; 3]>,
    /// Triangles as indices into `vertices`.
    pub faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Creates a mesh from vertices and triangle indices.
    pub fn new(vertices: Vec<[f64; 3]>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Returns true when the mesh has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Center of mass of the mesh surface.
    ///
    /// Triangle centers are weighted by triangle area. Meshes without faces, or whose
    /// faces all have zero area, fall back to the mean of the vertices. Returns `None`
    /// for an empty mesh.
    pub fn centroid(&self) -> Option<[f64; 3]> {
        if self.vertices.is_empty() {
            return None;
        }

        let mut total_area = 0.0;
        let mut weighted = [0.0; 3];
        for face in &self.faces {
            let (Some(a), Some(b), Some(c)) = (
                self.vertices.get(face[0]),
                self.vertices.get(face[1]),
                self.vertices.get(face[2]),
            ) else {
                continue;
            };
            let area = triangle_area(a, b, c);
            total_area += area;
            for i in 0..3 {
                weighted[i] += area * (a[i] + b[i] + c[i]) / 3.0;
            }
        }

        if total_area > 0.0 {
            return Some(weighted.map(|v| v / total_area));
        }

        let n = self.vertices.len() as f64;
        let mut mean = [0.0; 3];
        for v in &self.vertices {
            for i in 0..3 {
                mean[i] += v[i];
            }
        }
        Some(mean.map(|v| v / n))
    }

    /// Tight axis-aligned bounds of the vertices, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        let first = *self.vertices.first()?;
        let mut aabb = Aabb::new(first, first);
        for v in &self.vertices[1..] {
            for i in 0..3 {
                aabb.min[i] = aabb.min[i].min(v[i]);
                aabb.max[i] = aabb.max[i].max(v[i]);
            }
        }
        Some(aabb)
    }

    /// Side lengths of the bounds, zero for an empty mesh.
    pub fn extents(&self) -> [f64; 3] {
        self.bounds().map(|b| b.extents()).unwrap_or([0.0; 3])
    }

    /// Scale every vertex about the origin.
    pub fn apply_scale(&mut self, scale: [f64; 3]) {
        for v in self.vertices.iter_mut() {
            for i in 0..3 {
                v[i] *= scale[i];
            }
        }
    }

    /// Translate every vertex.
    pub fn apply_translation(&mut self, offset: [f64; 3]) {
        for v in self.vertices.iter_mut() {
            for i in 0..3 {
                v[i] += offset[i];
            }
        }
    }
}

fn triangle_area(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]) -> f64 {
    let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let cross = [
        ab[1] * ac[2] - ab[2] * ac[1],
        ab[2] * ac[0] - ab[0] * ac[2],
        ab[0] * ac[1] - ab[1] * ac[0],
    ];
    0.5 * (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cube() -> TriangleMesh {
        let mut vertices = Vec::new();
        for z in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for x in [0.0, 1.0] {
                    vertices.push([x, y, z]);
                }
            }
        }
        let faces = vec![
            [0, 1, 3],
            [0, 3, 2],
            [4, 6, 7],
            [4, 7, 5],
            [0, 4, 5],
            [0, 5, 1],
            [2, 3, 7],
            [2, 7, 6],
            [0, 2, 6],
            [0, 6, 4],
            [1, 5, 7],
            [1, 7, 3],
        ];
        TriangleMesh::new(vertices, faces)
    }

    #[test]
    fn cube_centroid_and_bounds() {
        let mut mesh = unit_cube();
        let c = mesh.centroid().unwrap();
        for v in c {
            assert_relative_eq!(v, 0.5, epsilon = 1e-12);
        }

        mesh.apply_scale([2.0, 1.0, 1.0]);
        mesh.apply_translation([-1.0, 0.0, 0.0]);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, [-1.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [1.0, 1.0, 1.0]);
        assert_eq!(mesh.extents(), [2.0, 1.0, 1.0]);
    }

    #[test]
    fn centroid_weights_by_area() {
        // a large triangle and a tiny one far away
        let mesh = TriangleMesh::new(
            vec![
                [0.0, 0.0, 0.0],
                [3.0, 0.0, 0.0],
                [0.0, 3.0, 0.0],
                [10.0, 10.0, 0.0],
                [10.001, 10.0, 0.0],
                [10.0, 10.001, 0.0],
            ],
            vec![[0, 1, 2], [3, 4, 5]],
        );
        let c = mesh.centroid().unwrap();
        assert_relative_eq!(c[0], 1.0, epsilon = 1e-4);
        assert_relative_eq!(c[1], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn point_cloud_centroid_is_mean() {
        let mesh = TriangleMesh::new(vec![[0.0, 0.0, 0.0], [2.0, 4.0, 6.0]], vec![]);
        assert_eq!(mesh.centroid(), Some([1.0, 2.0, 3.0]));
        assert_eq!(TriangleMesh::default().centroid(), None);
        assert_eq!(TriangleMesh::default().bounds(), None);
    }
}
