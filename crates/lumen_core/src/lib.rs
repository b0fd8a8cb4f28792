//! Lumen Core - Scene description for the Lumen sphere ray tracer.
//!
//! This crate provides:
//!
//! - **Scene data types**: `Scene`, `Sphere`, `Light`, `Material`
//! - **Environment map**: `Background`, an owned RGB8 buffer sampled by ray direction
//! - **Validation**: `SceneError` for inputs the renderer refuses to trace
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{Background, Scene};
//!
//! let background = Background::load("assets/envmap.jpg")?;
//! let scene = Scene::reference(background);
//! scene.validate()?;
//! println!("{} spheres, {} lights", scene.spheres.len(), scene.lights.len());
//! ```

pub mod background;
pub mod error;
pub mod light;
pub mod material;
pub mod scene;
pub mod sphere;

// Re-export commonly used types
pub use background::{Background, TextureError, TextureResult};
pub use error::{SceneError, SceneResult};
pub use light::Light;
pub use material::Material;
pub use scene::Scene;
pub use sphere::Sphere;
