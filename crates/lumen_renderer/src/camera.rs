//! Pinhole camera for primary ray generation.

use crate::Ray;
use lumen_core::scene::DEFAULT_FOV;
use lumen_math::Vec3;

/// Pinhole camera looking down -Z with +Y up.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    origin: Vec3,
    fov: f32, // Full field of view in radians, across the image height

    // Cached computed values (set by initialize())
    half_height: f32,
    aspect: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 1024,
            image_height: 768,
            origin: Vec3::ZERO,
            fov: DEFAULT_FOV,
            half_height: 0.0,
            aspect: 1.0,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set field of view in radians.
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    /// Set camera position.
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.half_height = (self.fov / 2.0).tan();
        self.aspect = self.image_width as f32 / self.image_height.max(1) as f32;
    }

    /// Generate the ray through the centre of pixel (i, j), with j = 0 at the
    /// top row.
    pub fn get_ray(&self, i: u32, j: u32) -> Ray {
        let w = self.image_width.max(1) as f32;
        let h = self.image_height.max(1) as f32;

        let x = (2.0 * (i as f32 + 0.5) / w - 1.0) * self.half_height * self.aspect;
        let y = -(2.0 * (j as f32 + 0.5) / h - 1.0) * self.half_height;

        Ray::new(self.origin, Vec3::new(x, y, -1.0).normalize())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
