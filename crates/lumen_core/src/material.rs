//! Phong material definition.

use lumen_math::{Vec3, Vec4};

use crate::error::{SceneError, SceneResult};

/// Surface description for Phong shading with reflection and refraction.
///
/// Materials are `Copy` and stored by value in every sphere, so editing one
/// sphere's material never leaks into another sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Index of refraction (1.0 = air, 1.5 = glass)
    pub refractive_index: f32,

    /// Weights of the diffuse, specular, reflected and refracted terms.
    /// Each is >= 0; they need not sum to 1.
    pub albedo: Vec4,

    /// Diffuse color (RGB, 0-1)
    pub diffuse_color: Vec3,

    /// Phong exponent of the specular highlight
    pub specular_exponent: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            refractive_index: 1.0,
            albedo: Vec4::new(1.0, 0.0, 0.0, 0.0),
            diffuse_color: Vec3::ZERO,
            specular_exponent: 0.0,
        }
    }
}

impl Material {
    pub fn new(
        refractive_index: f32,
        albedo: Vec4,
        diffuse_color: Vec3,
        specular_exponent: f32,
    ) -> Self {
        Self {
            refractive_index,
            albedo,
            diffuse_color,
            specular_exponent,
        }
    }

    pub fn ivory() -> Self {
        Self::new(
            1.0,
            Vec4::new(0.6, 0.3, 0.1, 0.0),
            Vec3::new(0.4, 0.4, 0.3),
            50.0,
        )
    }

    pub fn plastic() -> Self {
        Self::new(
            1.0,
            Vec4::new(0.9, 0.1, 0.0, 0.0),
            Vec3::new(0.3, 0.1, 0.1),
            10.0,
        )
    }

    pub fn mirror() -> Self {
        Self::new(
            1.0,
            Vec4::new(0.0, 10.0, 0.8, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            1425.0,
        )
    }

    pub fn glass() -> Self {
        Self::new(
            1.5,
            Vec4::new(0.0, 0.5, 0.1, 0.8),
            Vec3::new(0.6, 0.7, 0.8),
            125.0,
        )
    }

    /// All built-in presets with their palette names.
    pub fn presets() -> [(&'static str, Material); 4] {
        [
            ("ivory", Self::ivory()),
            ("plastic", Self::plastic()),
            ("mirror", Self::mirror()),
            ("glass", Self::glass()),
        ]
    }

    /// Weight of the diffuse term.
    #[inline]
    pub fn diffuse_weight(&self) -> f32 {
        self.albedo.x
    }

    /// Weight of the specular highlight.
    #[inline]
    pub fn specular_weight(&self) -> f32 {
        self.albedo.y
    }

    /// Weight of the reflected ray's color.
    #[inline]
    pub fn reflect_weight(&self) -> f32 {
        self.albedo.z
    }

    /// Weight of the refracted ray's color.
    #[inline]
    pub fn refract_weight(&self) -> f32 {
        self.albedo.w
    }

    /// Check the material belonging to sphere `index`.
    pub fn validate(&self, index: usize) -> SceneResult<()> {
        if self.albedo.cmplt(Vec4::ZERO).any() || self.albedo.is_nan() {
            return Err(SceneError::NegativeAlbedo { index });
        }
        if self.refractive_index.is_nan() || self.refractive_index <= 0.0 {
            return Err(SceneError::InvalidRefractiveIndex {
                index,
                value: self.refractive_index,
            });
        }
        Ok(())
    }
}
