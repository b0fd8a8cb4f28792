//! Ray/sphere intersection.

use crate::hittable::{HitRecord, Hittable};
use lumen_core::Sphere;
use lumen_math::{Aabb, Interval, Ray};

/// Smallest non-negative ray parameter at which `ray` meets `sphere`.
///
/// The ray direction must be unit length. Projects the center onto the ray,
/// rejects when the perpendicular distance exceeds the radius, then takes the
/// near root, or the far root when the origin is inside the sphere.
#[inline]
pub fn sphere_intersect(ray: &Ray, sphere: &Sphere) -> Option<f32> {
    let l = sphere.center - ray.origin();
    let projection = l.dot(ray.direction());
    let d2 = l.dot(l) - projection * projection;
    let r2 = sphere.radius * sphere.radius;

    // Ray line misses the sphere
    if d2 > r2 {
        return None;
    }

    let half_chord = (r2 - d2).sqrt();
    let mut t = projection - half_chord;
    if t < 0.0 {
        t = projection + half_chord;
    }
    if t < 0.0 {
        return None;
    }

    Some(t)
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let t = sphere_intersect(ray, self)?;
        if t < ray_t.min || t >= ray_t.max {
            return None;
        }
        Some(HitRecord::from_sphere(ray, t, self))
    }

    fn bounding_box(&self) -> Aabb {
        Sphere::bounding_box(self)
    }
}
