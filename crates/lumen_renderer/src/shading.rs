//! Recursive Whitted-style shading.
//!
//! Every hit gathers direct light from each point light (Lambert diffuse plus
//! Phong specular, with hard shadows) and recurses once for the mirror
//! reflection and once for the refraction. Rays that escape the scene, or run
//! past the depth limit, take their color from the environment map.

use crate::{HitRecord, Hittable, RenderConfig, World};
use lumen_core::{Light, Material};
use lumen_math::{Color, Interval, Ray, Vec3};

/// Distance secondary ray origins are pushed off the surface along the
/// normal, to keep them from hitting the surface they start on.
pub const SURFACE_OFFSET: f32 = 1e-3;

/// Mirror `i` about the plane with normal `n`.
#[inline]
pub fn reflect(i: Vec3, n: Vec3) -> Vec3 {
    i - n * 2.0 * i.dot(n)
}

/// Refract unit direction `i` through a surface with outward normal `n`.
///
/// The outside medium has index 1. When `i` leaves the medium (it points the
/// same way as `n`) the indices swap and the normal flips. Total internal
/// reflection returns `Vec3::ZERO`.
pub fn refract(i: Vec3, n: Vec3, refractive_index: f32) -> Vec3 {
    let mut cosi = -i.dot(n).clamp(-1.0, 1.0);
    let mut etai = 1.0;
    let mut etat = refractive_index;
    let mut n = n;

    // Ray inside the object
    if cosi < 0.0 {
        cosi = -cosi;
        std::mem::swap(&mut etai, &mut etat);
        n = -n;
    }

    let eta = etai / etat;
    let k = 1.0 - eta * eta * (1.0 - cosi * cosi);
    if k < 0.0 {
        Vec3::ZERO
    } else {
        i * eta + n * (eta * cosi - k.sqrt())
    }
}

/// Origin for a secondary ray leaving `p` along `dir`, nudged to the side of
/// the surface that `dir` points into.
#[inline]
fn offset_origin(p: Vec3, n: Vec3, dir: Vec3) -> Vec3 {
    if dir.dot(n) < 0.0 {
        p - n * SURFACE_OFFSET
    } else {
        p + n * SURFACE_OFFSET
    }
}

/// Environment color seen along a unit direction.
#[inline]
pub fn environment(world: &World, dir: Vec3) -> Color {
    world.background().sample_direction(dir)
}

/// Unweighted shading terms at one hit, before the material albedo is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceTerms {
    /// Sum of Lambert terms over unshadowed lights
    pub diffuse: f32,
    /// Sum of Phong highlight terms over unshadowed lights
    pub specular: f32,
    /// Color arriving along the mirror direction
    pub reflected: Color,
    /// Color arriving along the refracted direction (black under total
    /// internal reflection)
    pub refracted: Color,
}

impl SurfaceTerms {
    /// Weight each term by the material albedo and sum them.
    ///
    /// Nothing normalizes the result, so channels may exceed 1.
    pub fn combine(&self, material: &Material) -> Color {
        material.diffuse_color * self.diffuse * material.diffuse_weight()
            + Color::ONE * self.specular * material.specular_weight()
            + self.reflected * material.reflect_weight()
            + self.refracted * material.refract_weight()
    }
}

/// Diffuse and specular intensity that `light` adds at `rec` for a viewing
/// ray travelling along `dir`. Both are zero when anything lies between the
/// surface and the light.
pub fn light_contribution(world: &World, rec: &HitRecord, dir: Vec3, light: &Light) -> (f32, f32) {
    let to_light = light.position - rec.p;
    let light_distance = to_light.length();
    let light_dir = to_light.normalize();

    // Check if the point is in shadow of this light
    let shadow_ray = Ray::new(offset_origin(rec.p, rec.normal, light_dir), light_dir);
    if world.occluded(&shadow_ray, Interval::new(0.0, light_distance)) {
        return (0.0, 0.0);
    }

    let diffuse = light.intensity * light_dir.dot(rec.normal).max(0.0);
    let specular = reflect(light_dir, rec.normal)
        .dot(dir)
        .max(0.0)
        .powf(rec.material.specular_exponent)
        * light.intensity;

    (diffuse, specular)
}

/// Gather the shading terms at `rec`, recursing for reflection and refraction.
///
/// A secondary ray is only traced when its albedo weight is non-zero.
pub fn surface_terms(
    ray: &Ray,
    rec: &HitRecord,
    world: &World,
    depth: u32,
    config: &RenderConfig,
) -> SurfaceTerms {
    let dir = ray.direction();
    let n = rec.normal;
    let material = &rec.material;

    let reflected = if material.reflect_weight() != 0.0 {
        let reflect_dir = reflect(dir, n).normalize();
        let reflect_ray = Ray::new(offset_origin(rec.p, n, reflect_dir), reflect_dir);
        cast_ray(&reflect_ray, world, depth + 1, config)
    } else {
        Color::ZERO
    };

    let refracted = if material.refract_weight() != 0.0 {
        let refract_dir = refract(dir, n, material.refractive_index).normalize_or_zero();
        if refract_dir == Vec3::ZERO {
            Color::ZERO
        } else {
            let refract_ray = Ray::new(offset_origin(rec.p, n, refract_dir), refract_dir);
            cast_ray(&refract_ray, world, depth + 1, config)
        }
    } else {
        Color::ZERO
    };

    let (diffuse, specular) = world
        .lights()
        .iter()
        .map(|light| light_contribution(world, rec, dir, light))
        .fold((0.0, 0.0), |(d, s), (ld, ls)| (d + ld, s + ls));

    SurfaceTerms {
        diffuse,
        specular,
        reflected,
        refracted,
    }
}

/// Compute the color seen by a ray.
///
/// `depth` counts bounces so far; past `config.max_depth` the ray is treated
/// as escaping and takes the environment color.
pub fn cast_ray(ray: &Ray, world: &World, depth: u32, config: &RenderConfig) -> Color {
    if depth > config.max_depth {
        return environment(world, ray.direction());
    }

    match world.hit(ray, Interval::from_min(0.0)) {
        Some(rec) => surface_terms(ray, &rec, world, depth, config).combine(&rec.material),
        None => environment(world, ray.direction()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Background, Scene, Sphere};
    use lumen_math::Vec4;

    fn gradient() -> Background {
        Background::from_fn(64, 32, |x, y| [(x * 4) as u8, (y * 8) as u8, 200]).unwrap()
    }

    fn world_with(spheres: Vec<Sphere>, lights: Vec<Light>) -> World {
        let mut scene = Scene::new(gradient());
        scene.spheres = spheres;
        scene.lights = lights;
        World::new(scene).unwrap()
    }

    fn matte() -> Material {
        Material::new(1.0, Vec4::new(1.0, 0.0, 0.0, 0.0), Vec3::new(0.5, 0.5, 0.5), 10.0)
    }

    #[test]
    fn test_reflect() {
        let r = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_normal_incidence_passes_straight() {
        let r = refract(Vec3::NEG_Z, Vec3::Z, 1.5);
        assert!((r.normalize() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_refract_obeys_snell() {
        let theta_i = 30f32.to_radians();
        let i = Vec3::new(theta_i.sin(), -theta_i.cos(), 0.0);
        let r = refract(i, Vec3::Y, 1.5).normalize();

        // Entering glass from air: sin(theta_t) = sin(theta_i) / 1.5
        assert!((r.x - theta_i.sin() / 1.5).abs() < 1e-5);
        assert!(r.y < 0.0);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        // Leaving glass at 60 degrees, past the ~41.8 degree critical angle
        let theta = 60f32.to_radians();
        let i = Vec3::new(theta.sin(), theta.cos(), 0.0);
        assert_eq!(refract(i, Vec3::Y, 1.5), Vec3::ZERO);

        // 30 degrees is below the critical angle
        let theta = 30f32.to_radians();
        let i = Vec3::new(theta.sin(), theta.cos(), 0.0);
        assert_ne!(refract(i, Vec3::Y, 1.5), Vec3::ZERO);
    }

    #[test]
    fn test_miss_returns_environment() {
        let world = world_with(
            vec![Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::ivory())],
            vec![Light::new(Vec3::new(10.0, 10.0, 10.0), 2.0)],
        );
        let config = RenderConfig::default();

        for dir in [Vec3::Y, Vec3::Z, Vec3::new(0.3, -0.2, 0.9).normalize(), Vec3::new(-1.0, 0.0, 0.0)] {
            let ray = Ray::new(Vec3::ZERO, dir);
            assert_eq!(
                cast_ray(&ray, &world, 0, &config),
                world.background().sample_direction(dir)
            );
        }
    }

    #[test]
    fn test_depth_limit_returns_environment() {
        let world = world_with(
            vec![Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::ivory())],
            vec![Light::new(Vec3::new(0.0, 0.0, 10.0), 1.0)],
        );
        let config = RenderConfig::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert_eq!(
            cast_ray(&ray, &world, config.max_depth + 1, &config),
            environment(&world, Vec3::NEG_Z)
        );
        assert_ne!(
            cast_ray(&ray, &world, config.max_depth, &config),
            environment(&world, Vec3::NEG_Z)
        );
    }

    #[test]
    fn test_mirror_shows_environment_behind_camera() {
        let mirror = Material::new(1.0, Vec4::new(0.0, 0.0, 1.0, 0.0), Vec3::ONE, 0.0);
        let world = world_with(vec![Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, mirror)], vec![]);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let color = cast_ray(&ray, &world, 0, &RenderConfig::default());
        assert_eq!(color, environment(&world, Vec3::Z));
    }

    #[test]
    fn test_total_internal_reflection_gives_black_refraction() {
        let glass = Material::glass();
        let world = world_with(vec![Sphere::new(Vec3::ZERO, 1.0, glass)], vec![]);
        let config = RenderConfig::default();

        // From inside the sphere, 0.9 off axis: the exit angle is ~64 degrees
        let ray = Ray::new(Vec3::new(0.9, 0.0, 0.0), Vec3::Z);
        let rec = world.hit(&ray, Interval::from_min(0.0)).unwrap();
        let terms = surface_terms(&ray, &rec, &world, 0, &config);
        assert_eq!(terms.refracted, Color::ZERO);

        // 0.3 off axis leaves at ~17 degrees and picks up the environment
        let ray = Ray::new(Vec3::new(0.3, 0.0, 0.0), Vec3::Z);
        let rec = world.hit(&ray, Interval::from_min(0.0)).unwrap();
        let terms = surface_terms(&ray, &rec, &world, 0, &config);
        assert!(terms.refracted.length() > 0.0);
    }

    #[test]
    fn test_occluded_light_contributes_nothing() {
        let target = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, matte());
        let blocker = Sphere::new(Vec3::ZERO, 1.0, matte());
        let light = Light::new(Vec3::new(0.0, 0.0, 10.0), 1.5);

        let shadowed = world_with(vec![target, blocker], vec![light]);
        let lit = world_with(vec![target], vec![light]);

        // Starts past the blocker, looking at the near face of the target
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::NEG_Z);

        let rec = shadowed.hit(&ray, Interval::from_min(0.0)).unwrap();
        assert_eq!(light_contribution(&shadowed, &rec, ray.direction(), &light), (0.0, 0.0));

        let rec = lit.hit(&ray, Interval::from_min(0.0)).unwrap();
        let (diffuse, specular) = light_contribution(&lit, &rec, ray.direction(), &light);
        assert!(diffuse > 0.0);
        assert!((diffuse - 1.5).abs() < 1e-4);
        assert!(specular > 0.0);
    }

    #[test]
    fn test_specular_peaks_in_mirror_direction() {
        let world = world_with(vec![], vec![]);
        let light = Light::new(Vec3::new(1.0, 1.0, 0.0), 2.0);
        let mut material = matte();
        material.specular_exponent = 1.0;
        let rec = HitRecord {
            t: 1.0,
            p: Vec3::ZERO,
            normal: Vec3::Y,
            material,
        };

        // Viewer at (-1, 1, 0), on the mirror side of the light
        let mirror_view = Vec3::new(1.0, -1.0, 0.0).normalize();
        let (_, specular) = light_contribution(&world, &rec, mirror_view, &light);
        assert!((specular - 2.0).abs() < 1e-5);

        // Viewer looking back along the light gets no highlight
        let back_view = Vec3::new(-1.0, -1.0, 0.0).normalize();
        let (_, specular) = light_contribution(&world, &rec, back_view, &light);
        assert!(specular.abs() < 1e-5);
    }

    #[test]
    fn test_light_behind_surface_adds_no_diffuse() {
        let target = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, matte());
        let light = Light::new(Vec3::new(0.0, 0.0, -30.0), 1.0);
        let world = world_with(vec![target], vec![light]);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = world.hit(&ray, Interval::from_min(0.0)).unwrap();

        // The sphere itself blocks the light
        assert_eq!(light_contribution(&world, &rec, ray.direction(), &light), (0.0, 0.0));
    }

    #[test]
    fn test_diffuse_composite() {
        let target = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, matte());
        let world = world_with(vec![target], vec![Light::new(Vec3::ZERO, 2.0)]);

        let color = cast_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &world, 0, &RenderConfig::default());

        // diffuse_color * (2.0 * N.L) * albedo[0] with N.L = 1
        assert!((color - Vec3::splat(1.0)).length() < 1e-4);
    }

    #[test]
    fn test_combine_weights_terms() {
        let terms = SurfaceTerms {
            diffuse: 2.0,
            specular: 0.5,
            reflected: Color::new(1.0, 0.0, 0.0),
            refracted: Color::new(0.0, 0.0, 1.0),
        };
        let material = Material::new(1.5, Vec4::new(0.5, 2.0, 0.25, 4.0), Vec3::new(1.0, 0.5, 0.0), 1.0);

        let color = terms.combine(&material);
        assert!((color - Color::new(1.0 + 1.0 + 0.25, 0.5 + 1.0, 1.0 + 4.0)).length() < 1e-6);
    }
}
