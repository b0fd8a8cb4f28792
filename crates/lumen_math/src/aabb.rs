use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// The empty box has `min = +inf` and `max = -inf`, so growing a box is a
/// plain componentwise min/max fold with no first-element special case.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// Create a new AABB from its corners. Callers guarantee `min <= max`.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Grow this box to contain another box.
    #[inline]
    pub fn grow(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Grow this box to contain a point.
    #[inline]
    pub fn grow_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// True for the empty box (or any inverted one).
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Size of the box along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method using the ray's precomputed reciprocal direction. Each
    /// axis narrows `ray_t`; the test fails as soon as it becomes empty.
    #[inline]
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let inv = r.inv_direction[axis];
            let orig = r.origin[axis];

            let mut t0 = (self.min[axis] - orig) * inv;
            let mut t1 = (self.max[axis] - orig) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.is_empty() {
                return false;
            }
        }

        true
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    ///
    /// Ties resolve to the earlier axis: a later axis only wins when it is
    /// strictly longer.
    pub fn longest_axis(&self) -> usize {
        let extent = self.extent();
        let mut axis = 0;
        if extent.y > extent[axis] {
            axis = 1;
        }
        if extent.z > extent[axis] {
            axis = 2;
        }
        axis
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };
}
