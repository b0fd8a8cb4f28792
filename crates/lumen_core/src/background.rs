//! Environment map for rays that escape the scene.
//!
//! The background is an already decoded RGB8 buffer owned by the scene. The
//! renderer only samples it; decoding from disk happens in [`Background::load`]
//! and is never called from the tracing code.

use std::f32::consts::PI;
use std::path::Path;

use lumen_math::{Color, Vec3};
use thiserror::Error;

use crate::error::{SceneError, SceneResult};

/// Errors that can occur while loading a background image.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid background: {0}")]
    Invalid(#[from] SceneError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// RGB8 environment image, row-major with the origin at the top left.
#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Background {
    /// Wrap a decoded buffer of `width * height * 3` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> SceneResult<Self> {
        if width == 0 || height == 0 {
            return Err(SceneError::EmptyBackground);
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(SceneError::BackgroundSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A 1x1 background of a single color (channels clamped to [0, 1]).
    pub fn solid(color: Color) -> Self {
        let c = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
        Self {
            width: 1,
            height: 1,
            data: vec![c.x as u8, c.y as u8, c.z as u8],
        }
    }

    /// Build a background by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 3]) -> SceneResult<Self> {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::new(width, height, data)
    }

    /// Decode an image file into an RGB8 background.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let background = Self::new(width, height, rgb.into_raw())?;

        log::debug!(
            "Loaded background: {} ({}x{}, {:.1} KB)",
            path.display(),
            width,
            height,
            background.size_bytes() as f32 / 1024.0
        );

        Ok(background)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Pixel at integer coordinates, normalized to [0, 1]. Coordinates are
    /// clamped into the image.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = (y * self.width as usize + x) * 3;
        Color::new(
            self.data[idx] as f32 / 255.0,
            self.data[idx + 1] as f32 / 255.0,
            self.data[idx + 2] as f32 / 255.0,
        )
    }

    /// Texture coordinates of a unit direction on the equirectangular map.
    pub fn direction_to_uv(dir: Vec3) -> (f32, f32) {
        let u = 0.5 + dir.z.atan2(dir.x) / (2.0 * PI);
        let v = 0.5 - dir.y.clamp(-1.0, 1.0).asin() / PI;
        (u, v)
    }

    /// Color seen along a unit direction.
    pub fn sample_direction(&self, dir: Vec3) -> Color {
        let (u, v) = Self::direction_to_uv(dir);
        let px = to_pixel(u, self.width);
        let py = to_pixel(v, self.height);
        self.pixel(px, py)
    }
}

/// Scale a texture coordinate to a pixel index clamped into `[0, size - 1]`.
#[inline]
fn to_pixel(coord: f32, size: u32) -> u32 {
    // `as` saturates and maps NaN to 0
    let p = (coord * size as f32) as i64;
    p.clamp(0, size as i64 - 1) as u32
}
