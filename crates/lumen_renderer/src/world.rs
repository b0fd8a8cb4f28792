//! A validated scene together with its acceleration structure.

use std::time::Instant;

use crate::{Bvh, HitRecord, Hittable};
use lumen_core::{Background, Light, Material, Scene, SceneError, SceneResult, Sphere};
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// Scene plus the BVH derived from its sphere geometry.
///
/// All sphere edits go through `World`, so the tree can never fall out of
/// date: geometry edits rebuild it, material edits leave it untouched.
/// Editing needs `&mut self`, which rules out edits during a render that
/// borrows the world.
#[derive(Debug, Clone)]
pub struct World {
    scene: Scene,
    bvh: Option<Bvh>,
}

impl World {
    /// Validate `scene` and build its BVH.
    pub fn new(scene: Scene) -> SceneResult<Self> {
        scene.validate()?;
        let bvh = build_logged(&scene.spheres);
        Ok(Self {
            scene,
            bvh: Some(bvh),
        })
    }

    /// Validate `scene` but answer queries by scanning every sphere.
    pub fn without_bvh(scene: Scene) -> SceneResult<Self> {
        scene.validate()?;
        log::info!("BVH disabled, tracing {} spheres linearly", scene.spheres.len());
        Ok(Self { scene, bvh: None })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.scene.spheres
    }

    pub fn lights(&self) -> &[Light] {
        &self.scene.lights
    }

    pub fn background(&self) -> &Background {
        &self.scene.background
    }

    pub fn fov(&self) -> f32 {
        self.scene.fov
    }

    /// The acceleration structure, if enabled.
    pub fn bvh(&self) -> Option<&Bvh> {
        self.bvh.as_ref()
    }

    /// Replace the material of one sphere. The BVH stays valid.
    pub fn set_sphere_material(&mut self, index: usize, material: Material) -> SceneResult<()> {
        material.validate(index)?;
        let sphere = self.sphere_mut(index)?;
        sphere.material = material;
        Ok(())
    }

    /// Move or resize one sphere and rebuild the BVH.
    pub fn set_sphere_geometry(&mut self, index: usize, center: Vec3, radius: f32) -> SceneResult<()> {
        let mut sphere = *self.sphere_mut(index)?;
        sphere.center = center;
        sphere.radius = radius;
        self.replace_sphere(index, sphere)
    }

    /// Replace one sphere, rebuilding the BVH only if its geometry changed.
    pub fn replace_sphere(&mut self, index: usize, sphere: Sphere) -> SceneResult<()> {
        sphere.validate(index)?;
        let slot = self.sphere_mut(index)?;
        let geometry_changed = !slot.same_geometry(&sphere);
        *slot = sphere;
        if geometry_changed {
            self.rebuild();
        }
        Ok(())
    }

    /// Append a sphere, rebuild the BVH and return the new sphere's index.
    pub fn push_sphere(&mut self, sphere: Sphere) -> SceneResult<usize> {
        let index = self.scene.spheres.len();
        sphere.validate(index)?;
        self.scene.spheres.push(sphere);
        self.rebuild();
        Ok(index)
    }

    /// Add a light. Lights are not part of the BVH.
    pub fn push_light(&mut self, light: Light) -> SceneResult<()> {
        light.validate(self.scene.lights.len())?;
        self.scene.lights.push(light);
        Ok(())
    }

    fn sphere_mut(&mut self, index: usize) -> SceneResult<&mut Sphere> {
        let len = self.scene.spheres.len();
        self.scene
            .spheres
            .get_mut(index)
            .ok_or(SceneError::SphereIndexOutOfRange { index, len })
    }

    fn rebuild(&mut self) {
        if self.bvh.is_some() {
            self.bvh = Some(build_logged(&self.scene.spheres));
        }
    }
}

/// Build a BVH and report its shape.
fn build_logged(spheres: &[Sphere]) -> Bvh {
    let start = Instant::now();
    let bvh = Bvh::build(spheres);
    let stats = bvh.stats();
    log::info!(
        "BVH: {} spheres, {} nodes, {} leaves, depth {} ({:?})",
        stats.primitives,
        stats.nodes,
        stats.leaves,
        stats.depth,
        start.elapsed()
    );
    bvh
}

impl Hittable for World {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match &self.bvh {
            Some(bvh) => bvh.hit(&self.scene.spheres, ray, ray_t),
            None => self.scene.spheres.as_slice().hit(ray, ray_t),
        }
    }

    fn occluded(&self, ray: &Ray, ray_t: Interval) -> bool {
        match &self.bvh {
            Some(bvh) => bvh.occluded(&self.scene.spheres, ray, ray_t),
            None => self.scene.spheres.as_slice().occluded(ray, ray_t),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match &self.bvh {
            Some(bvh) => bvh.bounding_box(),
            None => self.scene.spheres.as_slice().bounding_box(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        let scene = Scene::reference(Background::solid(Vec3::new(0.1, 0.2, 0.3)));
        World::new(scene).unwrap()
    }

    #[test]
    fn test_invalid_scene_rejected() {
        let scene = Scene::new(Background::solid(Vec3::ZERO))
            .with_sphere(Sphere::new(Vec3::ZERO, -2.0, Material::ivory()));
        assert!(matches!(
            World::new(scene),
            Err(SceneError::InvalidRadius { index: 0, .. })
        ));
    }

    #[test]
    fn test_material_edit_keeps_tree() {
        let mut world = world();
        let before = world.bvh().unwrap().nodes().to_vec();

        world.set_sphere_material(0, Material::mirror()).unwrap();

        assert_eq!(world.spheres()[0].material, Material::mirror());
        assert_eq!(world.spheres()[1].material, Material::glass());
        assert_eq!(world.bvh().unwrap().nodes(), before.as_slice());
    }

    #[test]
    fn test_geometry_edit_rebuilds_tree() {
        let mut world = world();

        // Move the plastic sphere straight ahead of the camera
        world
            .set_sphere_geometry(0, Vec3::new(0.0, 0.0, -4.0), 1.0)
            .unwrap();

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = world.hit(&ray, Interval::from_min(0.0)).unwrap();
        assert!((rec.t - 3.0).abs() < 1e-4);
        assert_eq!(rec.material, Material::plastic());
    }

    #[test]
    fn test_push_sphere_rebuilds_tree() {
        let mut world = world();
        let index = world
            .push_sphere(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, Material::ivory()))
            .unwrap();

        assert_eq!(index, 4);
        assert_eq!(world.bvh().unwrap().primitive_count(), 5);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = world.hit(&ray, Interval::from_min(0.0)).unwrap();
        assert!((rec.t - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_bad_edits_rejected() {
        let mut world = world();

        assert_eq!(
            world.set_sphere_material(9, Material::ivory()),
            Err(SceneError::SphereIndexOutOfRange { index: 9, len: 4 })
        );
        assert!(world.set_sphere_geometry(1, Vec3::ZERO, 0.0).is_err());
        assert!(world.push_light(Light::new(Vec3::ZERO, f32::NAN)).is_err());

        // Rejected edits leave the scene untouched
        assert_eq!(world.spheres()[1].radius, 2.0);
        assert_eq!(world.lights().len(), 3);
    }

    #[test]
    fn test_linear_world_matches_bvh_world() {
        let scene = Scene::reference(Background::solid(Vec3::ONE));
        let linear = World::without_bvh(scene.clone()).unwrap();
        let accelerated = World::new(scene).unwrap();
        assert!(linear.bvh().is_none());

        for j in 0..20 {
            for i in 0..20 {
                let dir = Vec3::new(i as f32 / 10.0 - 1.0, j as f32 / 10.0 - 1.0, -1.0).normalize();
                let ray = Ray::new(Vec3::ZERO, dir);
                let a = linear.hit(&ray, Interval::from_min(0.0)).map(|r| r.t);
                let b = accelerated.hit(&ray, Interval::from_min(0.0)).map(|r| r.t);
                assert_eq!(a, b);
            }
        }
        assert_eq!(linear.bounding_box(), accelerated.bounding_box());
    }
}
