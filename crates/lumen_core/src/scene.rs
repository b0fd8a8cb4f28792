//! Scene description for Lumen.
//!
//! A scene is plain data: spheres, point lights, a palette of named
//! materials, the environment image and the camera field of view. Acceleration
//! structures are derived from it by the renderer.

use std::collections::BTreeMap;

use lumen_math::{Aabb, Vec3};

use crate::background::Background;
use crate::error::SceneResult;
use crate::light::Light;
use crate::material::Material;
use crate::sphere::Sphere;

/// Default field of view in radians (about 60 degrees).
pub const DEFAULT_FOV: f32 = 1.05;

/// Everything needed to render one frame.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Spheres in insertion order; BVH leaves refer to these indices
    pub spheres: Vec<Sphere>,

    /// Point lights
    pub lights: Vec<Light>,

    /// Named materials available for assignment
    pub materials: BTreeMap<String, Material>,

    /// Environment map for escaping rays
    pub background: Background,

    /// Vertical field of view, radians
    pub fov: f32,
}

impl Scene {
    /// Create an empty scene with the built-in material palette.
    pub fn new(background: Background) -> Self {
        let materials = Material::presets()
            .into_iter()
            .map(|(name, material)| (name.to_string(), material))
            .collect();

        Self {
            spheres: Vec::new(),
            lights: Vec::new(),
            materials,
            background,
            fov: DEFAULT_FOV,
        }
    }

    /// Four spheres and three lights: plastic, glass, ivory and a large mirror.
    pub fn reference(background: Background) -> Self {
        Self::new(background)
            .with_sphere(Sphere::new(Vec3::new(-3.0, 0.0, -16.0), 2.0, Material::plastic()))
            .with_sphere(Sphere::new(Vec3::new(-1.0, -1.5, -12.0), 2.0, Material::glass()))
            .with_sphere(Sphere::new(Vec3::new(1.5, -0.5, -18.0), 2.0, Material::ivory()))
            .with_sphere(Sphere::new(Vec3::new(7.0, 5.0, -18.0), 4.0, Material::mirror()))
            .with_light(Light::new(Vec3::new(-20.0, 20.0, 20.0), 1.5))
            .with_light(Light::new(Vec3::new(30.0, 50.0, -25.0), 1.8))
            .with_light(Light::new(Vec3::new(30.0, 20.0, 30.0), 1.7))
    }

    pub fn with_sphere(mut self, sphere: Sphere) -> Self {
        self.spheres.push(sphere);
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    /// Add a named material to the palette, replacing any previous entry.
    pub fn add_material(&mut self, name: impl Into<String>, material: Material) {
        self.materials.insert(name.into(), material);
    }

    /// Look up a palette material by name.
    pub fn material(&self, name: &str) -> Option<Material> {
        self.materials.get(name).copied()
    }

    /// Check every sphere and light. Run once before rendering.
    pub fn validate(&self) -> SceneResult<()> {
        for (index, sphere) in self.spheres.iter().enumerate() {
            sphere.validate(index)?;
        }
        for (index, light) in self.lights.iter().enumerate() {
            light.validate(index)?;
        }
        Ok(())
    }

    /// Bounding box of all spheres (empty box for an empty scene).
    pub fn bounds(&self) -> Aabb {
        self.spheres.iter().fold(Aabb::EMPTY, |mut acc, sphere| {
            acc.grow(&sphere.bounding_box());
            acc
        })
    }
}
