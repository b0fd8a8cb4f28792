//! Validation errors for scene input.

use thiserror::Error;

/// Scene inputs the renderer refuses to trace.
///
/// These are checked once when a scene is validated, never per ray.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("sphere {index} has invalid radius {radius} (must be finite and > 0)")]
    InvalidRadius { index: usize, radius: f32 },

    #[error("sphere {index} has a non-finite center")]
    InvalidCenter { index: usize },

    #[error("sphere {index} has a negative albedo component")]
    NegativeAlbedo { index: usize },

    #[error("sphere {index} has invalid refractive index {value} (must be > 0)")]
    InvalidRefractiveIndex { index: usize, value: f32 },

    #[error("sphere index {index} out of range ({len} spheres)")]
    SphereIndexOutOfRange { index: usize, len: usize },

    #[error("light {index} has invalid intensity {intensity}")]
    InvalidLight { index: usize, intensity: f32 },

    #[error("background is {width}x{height} but holds {actual} bytes (expected {expected})")]
    BackgroundSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("background has zero width or height")]
    EmptyBackground,
}

pub type SceneResult<T> = Result<T, SceneError>;
