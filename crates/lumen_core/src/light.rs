//! Point lights.

use lumen_math::Vec3;

use crate::error::{SceneError, SceneResult};

/// A point light. Intensity is not attenuated with distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub intensity: f32,
}

impl Light {
    pub fn new(position: Vec3, intensity: f32) -> Self {
        Self {
            position,
            intensity,
        }
    }

    /// Check light `index`: finite position and non-negative intensity.
    pub fn validate(&self, index: usize) -> SceneResult<()> {
        if !self.position.is_finite() || self.intensity.is_nan() || self.intensity < 0.0 {
            return Err(SceneError::InvalidLight {
                index,
                intensity: self.intensity,
            });
        }
        Ok(())
    }
}
