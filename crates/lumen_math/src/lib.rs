// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod interval;
mod ray;
pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Linear RGB color. Channels are nominally in [0, 1] but shading may exceed 1.
pub type Color = Vec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::splat(3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_vec3_normalize() {
        let v = Vec3::new(3.0, 0.0, 4.0);
        assert_eq!(v.length(), 5.0);
        assert!((v.normalize().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_vec4_components() {
        let albedo = Vec4::new(0.6, 0.3, 0.1, 0.0);
        assert_eq!(albedo.x, 0.6);
        assert_eq!(albedo[3], 0.0);
    }
}
