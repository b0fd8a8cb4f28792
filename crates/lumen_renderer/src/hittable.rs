//! Hittable trait and HitRecord for ray-object intersection.

use lumen_core::{Material, Sphere};
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Holds a copy of the surface material so shading never reaches back into
/// the scene for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Outward unit surface normal at `p`
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: Material,
}

impl HitRecord {
    /// Build the record for `sphere` hit by `ray` at parameter `t`.
    #[inline]
    pub fn from_sphere(ray: &Ray, t: f32, sphere: &Sphere) -> Self {
        let p = ray.at(t);
        Self {
            t,
            p,
            normal: sphere.normal_at(p),
            material: sphere.material,
        }
    }
}

/// Trait for objects that can be hit by rays.
///
/// Accepted hits lie in the half-open range `[ray_t.min, ray_t.max)`: a hit
/// exactly at `max` is rejected, so narrowing `max` to the best distance so
/// far only accepts strict improvements.
pub trait Hittable: Send + Sync {
    /// Nearest hit within `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;

    /// True if anything is hit within `ray_t`. Implementations may stop at
    /// the first hit instead of searching for the nearest one.
    fn occluded(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.hit(ray, ray_t).is_some()
    }

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// Brute-force scan over every sphere. Reference implementation for the BVH.
impl Hittable for [Sphere] {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest_so_far = ray_t.max;
        let mut best = None;

        for sphere in self {
            if let Some(rec) = sphere.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                best = Some(rec);
            }
        }

        best
    }

    fn occluded(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.iter().any(|sphere| sphere.hit(ray, ray_t).is_some())
    }

    fn bounding_box(&self) -> Aabb {
        self.iter().fold(Aabb::EMPTY, |mut acc, sphere| {
            acc.grow(&sphere.bounding_box());
            acc
        })
    }
}
