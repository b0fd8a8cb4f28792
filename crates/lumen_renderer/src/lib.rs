//! Lumen Renderer - Whitted-style CPU ray tracing.
//!
//! Traces spheres lit by point lights with Phong shading, hard shadows,
//! mirror reflection and refraction, falling back to an environment map.
//! Ray/scene queries go through a flat median-split BVH.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod renderer;
mod shading;
mod sphere;
mod world;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{Bvh, BvhNode, BvhStats, LEAF_MAX_SIZE};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable};
pub use renderer::{color_to_rgb8, render, render_pixel, ImageBuffer, RenderConfig};
pub use shading::{
    cast_ray, environment, light_contribution, reflect, refract, surface_terms, SurfaceTerms,
    SURFACE_OFFSET,
};
pub use sphere::sphere_intersect;
pub use world::World;

/// Re-export common math types from lumen_math
pub use lumen_math::{Aabb, Color, Interval, Ray, Vec3};
