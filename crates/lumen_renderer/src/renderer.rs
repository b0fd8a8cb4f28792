//! Image rendering.
//!
//! One primary ray per pixel through the pinhole camera, shaded by
//! `cast_ray`. Buckets are rendered in parallel with rayon and written into
//! an `ImageBuffer`, which tone maps to 8-bit RGB.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::{cast_ray, Camera, Color, World};

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Deepest bounce that still gets shaded; rays past it see the environment
    pub max_depth: u32,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            max_depth: 4,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Map a linear color to 8-bit RGB.
///
/// If the brightest channel exceeds 1, all channels are scaled down by it,
/// which keeps the hue of over-bright pixels.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let max = color.max_element();
    let color = if max > 1.0 { color / max } else { color };
    let c = (color.clamp(Color::ZERO, Color::ONE) * 255.0).to_array();
    [c[0] as u8, c[1] as u8, c[2] as u8]
}

/// Color of pixel (x, y).
pub fn render_pixel(camera: &Camera, world: &World, x: u32, y: u32, config: &RenderConfig) -> Color {
    let ray = camera.get_ray(x, y);
    cast_ray(&ray, world, 0, config)
}

/// Image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width as usize) * (height as usize)],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.offset(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.offset(x, y);
        self.pixels[i] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, line) in result.pixels.chunks(bucket.width.max(1) as usize).enumerate() {
            let start = self.offset(bucket.x, bucket.y + row as u32);
            self.pixels[start..start + line.len()].copy_from_slice(line);
        }
    }

    /// Tone map to packed RGB bytes, row-major from the top-left.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&c| color_to_rgb8(c)).collect()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render the whole image.
///
/// The camera takes its resolution from `config` and its field of view from
/// the world's scene. Buckets only read the world, so they run on the rayon
/// pool without locking.
pub fn render(camera: &Camera, world: &World, config: &RenderConfig) -> ImageBuffer {
    let mut camera = camera
        .clone()
        .with_resolution(config.width, config.height)
        .with_fov(world.fov());
    camera.initialize();

    let start = Instant::now();
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);
    log::info!(
        "Rendering {}x{} in {} buckets (max depth {})",
        config.width,
        config.height,
        buckets.len(),
        config.max_depth
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, &camera, world, config))
        .collect();

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
