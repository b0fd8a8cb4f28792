//! `lumen` - render the reference sphere scene to an image file.

mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::{Background, Scene};
use lumen_math::Color;
use lumen_renderer::{render, Camera, RenderConfig, World};

/// Shown where the environment map should be when it can't be loaded.
const FALLBACK_BACKGROUND: Color = Color::new(0.2, 0.7, 0.8);

/// Whitted-style sphere ray tracer
#[derive(Parser, Debug)]
#[command(name = "lumen", version)]
struct Args {
    /// Equirectangular environment map (any format the image crate reads)
    #[arg(short, long, default_value = "assets/envmap.jpg")]
    background: PathBuf,

    /// Output image; .ppm is written as binary P6, other extensions via the image crate
    #[arg(short, long, default_value = "output/out.ppm")]
    output: PathBuf,

    /// JSON render settings; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Field of view in radians
    #[arg(long)]
    fov: Option<f32>,

    /// Maximum reflection/refraction depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Bucket edge length in pixels
    #[arg(long)]
    bucket_size: Option<u32>,

    /// Trace every sphere for every ray instead of using the BVH
    #[arg(long)]
    no_bvh: bool,
}

impl Args {
    /// Render settings from the config file (if any) with flags applied on top.
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(bucket_size) = self.bucket_size {
            config.bucket_size = bucket_size;
        }

        anyhow::ensure!(
            config.width > 0 && config.height > 0,
            "image size must be non-zero, got {}x{}",
            config.width,
            config.height
        );
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<RenderConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    log::debug!("Loaded render config from {}", path.display());
    Ok(config)
}

fn load_background(path: &Path) -> Background {
    match Background::load(path) {
        Ok(background) => {
            log::info!(
                "Loaded background {} ({}x{})",
                path.display(),
                background.width(),
                background.height()
            );
            background
        }
        Err(e) => {
            log::warn!("Could not load background {}: {e}; using a solid color", path.display());
            Background::solid(FALLBACK_BACKGROUND)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.render_config()?;

    let mut scene = Scene::reference(load_background(&args.background));
    if let Some(fov) = args.fov {
        scene.fov = fov;
    }

    let world = if args.no_bvh {
        World::without_bvh(scene)
    } else {
        World::new(scene)
    }
    .context("invalid scene")?;

    let image = render(&Camera::new(), &world, &config);
    output::save(&image, &args.output)
}
