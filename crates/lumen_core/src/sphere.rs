//! Sphere primitive description.

use lumen_math::{Aabb, Vec3};

use crate::error::{SceneError, SceneResult};
use crate::material::Material;

/// A sphere with its own copy of a material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Axis-aligned box tightly enclosing the sphere.
    pub fn bounding_box(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        Aabb::new(self.center - rvec, self.center + rvec)
    }

    /// Outward unit normal at a point on the surface.
    #[inline]
    pub fn normal_at(&self, p: Vec3) -> Vec3 {
        (p - self.center).normalize()
    }

    /// Check the geometry and material of sphere `index`.
    pub fn validate(&self, index: usize) -> SceneResult<()> {
        if !self.center.is_finite() {
            return Err(SceneError::InvalidCenter { index });
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(SceneError::InvalidRadius {
                index,
                radius: self.radius,
            });
        }
        self.material.validate(index)
    }

    /// True if `other` occupies the same volume (materials are ignored).
    pub fn same_geometry(&self, other: &Sphere) -> bool {
        self.center == other.center && self.radius == other.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let sphere = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 0.5, Material::default());
        let bbox = sphere.bounding_box();

        assert_eq!(bbox.min, Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(bbox.max, Vec3::new(1.5, 2.5, 3.5));
        assert_eq!(bbox.centroid(), sphere.center);
    }

    #[test]
    fn test_normal_points_outward() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, Material::default());
        let n = sphere.normal_at(Vec3::new(0.0, 2.0, 0.0));
        assert!((n - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        let zero = Sphere::new(Vec3::ZERO, 0.0, Material::default());
        assert!(matches!(
            zero.validate(2),
            Err(SceneError::InvalidRadius { index: 2, .. })
        ));

        let negative = Sphere::new(Vec3::ZERO, -1.0, Material::default());
        assert!(negative.validate(0).is_err());
    }

    #[test]
    fn test_non_finite_center_rejected() {
        let sphere = Sphere::new(Vec3::new(f32::NAN, 0.0, 0.0), 1.0, Material::default());
        assert_eq!(
            sphere.validate(0),
            Err(SceneError::InvalidCenter { index: 0 })
        );
    }

    #[test]
    fn test_same_geometry_ignores_material() {
        let a = Sphere::new(Vec3::ONE, 1.0, Material::ivory());
        let b = Sphere::new(Vec3::ONE, 1.0, Material::glass());
        let c = Sphere::new(Vec3::ONE, 2.0, Material::ivory());

        assert!(a.same_geometry(&b));
        assert!(!a.same_geometry(&c));
    }
}
