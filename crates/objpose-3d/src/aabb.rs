use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in 3d.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: [f64; 3],
    /// Maximum corner.
    pub max: [f64; 3],
}

impl Aabb {
    /// Creates a box from its minimum and maximum corners.
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Side lengths of the box.
    pub fn extents(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Volume of the box; zero when any side length is not positive.
    pub fn volume(&self) -> f64 {
        let extents = self.extents();
        if extents.iter().any(|&e| e <= 0.0) {
            return 0.0;
        }
        extents.iter().product()
    }

    /// The overlap of two boxes. The result may be degenerate (zero volume).
    pub fn intersection(&self, other: &Aabb) -> Aabb {
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for i in 0..3 {
            min[i] = self.min[i].max(other.min[i]);
            max[i] = self.max[i].min(other.max[i]);
        }
        Aabb { min, max }
    }
}

/// Returns how much of `aabb2` is contained by `aabb1`.
///
/// This is the volume of the intersection divided by the volume of `aabb2`, clamped to
/// `[0, 1]`. A degenerate `aabb2` (zero volume) gives 0.
///
/// ```
/// use objpose_3d::aabb::{aabb_contained_ratio, Aabb};
///
/// let outer = Aabb::new([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
/// let inner = Aabb::new([1.0, 1.0, 1.0], [3.0, 3.0, 3.0]);
/// assert_eq!(aabb_contained_ratio(&outer, &inner), 0.125);
/// ```
pub fn aabb_contained_ratio(aabb1: &Aabb, aabb2: &Aabb) -> f64 {
    let volume2 = aabb2.volume();
    if volume2 <= 0.0 {
        return 0.0;
    }
    let volume_intersect = aabb1.intersection(aabb2).volume();
    (volume_intersect / volume2).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_boxes() {
        let a = Aabb::new([-0.1, 0.2, 0.0], [0.3, 0.5, 0.25]);
        assert_eq!(aabb_contained_ratio(&a, &a), 1.0);
    }

    #[test]
    fn disjoint_boxes() {
        let a = Aabb::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = Aabb::new([2.0, 0.0, 0.0], [3.0, 1.0, 1.0]);
        assert_eq!(aabb_contained_ratio(&a, &b), 0.0);
        // touching faces do not overlap
        let c = Aabb::new([1.0, 0.0, 0.0], [2.0, 1.0, 1.0]);
        assert_eq!(aabb_contained_ratio(&a, &c), 0.0);
    }

    #[test]
    fn ratio_is_directional_and_bounded() {
        let big = Aabb::new([0.0, 0.0, 0.0], [4.0, 4.0, 4.0]);
        let small = Aabb::new([1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);
        assert_eq!(aabb_contained_ratio(&big, &small), 1.0);
        assert_eq!(aabb_contained_ratio(&small, &big), 1.0 / 64.0);

        let flat = Aabb::new([0.0, 0.0, 0.0], [1.0, 1.0, 0.0]);
        assert_eq!(aabb_contained_ratio(&big, &flat), 0.0);

        for shift in [-3.0, -0.5, 0.0, 0.7, 5.0] {
            let moved = Aabb::new([shift, 0.0, 0.0], [shift + 4.5, 4.0, 4.0]);
            let r = aabb_contained_ratio(&big, &moved);
            assert!((0.0..=1.0).contains(&r));
        }
    }
}
