//! raybow renderer - CPU path tracing
//!
//! A Monte Carlo path tracer over spheres and triangles: a BVH for
//! closest-hit queries, a thin-lens camera, four materials and a bucketed
//! multi-threaded integrator whose output depends only on the scene, the
//! configuration and the seed.

mod background;
mod bucket;
mod bvh;
mod camera;
mod error;
mod framebuffer;
mod hittable;
mod material;
mod primitive;
mod renderer;
mod scene;
mod sphere;
mod triangle;

pub mod sampling;

pub use background::Background;
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::{Camera, CameraBuilder};
pub use error::{RenderError, RenderResult};
pub use framebuffer::{FrameBuffer, RenderedImage};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{reflectance, Material, MaterialId, ScatterResult};
pub use primitive::Primitive;
pub use renderer::{ray_color, render, render_pixel, RenderConfig, T_MIN};
pub use scene::{Scene, SceneBuilder};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export the math types used throughout the public API
pub use raybow_math::{Aabb, Color, Interval, Ray, Vec3};
