//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Anti-aliasing via jittered multi-sampling
//! - Bucketed parallel rendering on a rayon thread pool

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::RngCore;
use rayon::prelude::*;
use raybow_math::{Color, Interval, Ray};

use crate::background::Background;
use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::framebuffer::FrameBuffer;
use crate::sampling::{pixel_rng, sample_square};
use crate::scene::Scene;

/// Closest distance a scattered ray may hit, to avoid self-intersection.
pub const T_MIN: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of bounces per path
    pub max_depth: u32,
    /// What rays that escape the scene see
    pub background: Background,
    /// Root of every per-pixel random stream
    pub seed: u64,
    /// Worker threads; `None` uses one per logical core
    pub threads: Option<usize>,
    /// Edge length of the square render buckets
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            background: Background::SKY,
            seed: 0,
            threads: None,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    /// Check the configuration before any work is scheduled.
    pub fn validate(&self) -> RenderResult<()> {
        let pixels = (self.width as usize).checked_mul(self.height as usize);
        if self.width == 0 || self.height == 0 || pixels.and_then(|p| p.checked_mul(3)).is_none() {
            return Err(RenderError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::ZeroSamples);
        }
        if self.max_depth == 0 {
            return Err(RenderError::ZeroDepth);
        }
        if self.bucket_size == 0 {
            return Err(RenderError::ZeroBucketSize);
        }
        Ok(())
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, adding each surface's emission and
/// multiplying by its attenuation at every bounce. `depth` is the number of
/// bounces left; a path that runs out contributes black.
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = scene.closest_hit(ray, Interval::new(T_MIN, f32::INFINITY)) else {
        return background.sample(ray.direction());
    };

    let material = scene.material(rec.material);
    let emission = material.emitted();

    match material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, scene, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        None => emission,
    }
}

/// Trace every sample of pixel (x, y).
///
/// Returns the sum of the `samples_per_pixel` sample colors. The pixel's
/// random stream depends only on the seed and the pixel's position.
pub fn render_pixel(camera: &Camera, scene: &Scene, x: u32, y: u32, config: &RenderConfig) -> Color {
    let pixel_index = y as u64 * config.width as u64 + x as u64;
    let mut rng = pixel_rng(config.seed, pixel_index);

    let inv_width = 1.0 / config.width as f32;
    let inv_height = 1.0 / config.height as f32;
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let (dx, dy) = sample_square(&mut rng);
        let s = (x as f32 + 0.5 + dx) * inv_width;
        let t = (y as f32 + 0.5 + dy) * inv_height;

        let ray = camera.get_ray(s, t, &mut rng);
        pixel_color += ray_color(&ray, scene, config.max_depth, &config.background, &mut rng);
    }

    pixel_color
}

/// Render the entire image.
///
/// Buckets are handed to a dedicated rayon pool in centre-out order; the
/// result is identical for any thread count or bucket size.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig) -> RenderResult<FrameBuffer> {
    config.validate()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.unwrap_or(0))
        .thread_name(|i| format!("raybow-worker-{}", i))
        .build()?;

    let buckets = generate_buckets(config.width, config.height, config.bucket_size);
    let total = buckets.len();
    let completed = AtomicUsize::new(0);

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}: {} primitives, {} buckets on {} threads",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        scene.primitive_count(),
        total,
        pool.current_num_threads()
    );

    let start = Instant::now();
    let results: Vec<BucketResult> = pool.install(|| {
        buckets
            .par_iter()
            .map(|bucket| {
                let pixels = render_bucket(bucket, camera, scene, config);
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                log::debug!("Bucket {} done ({}/{})", bucket.index, done, total);
                BucketResult::new(*bucket, pixels)
            })
            .collect()
    });

    let mut frame = FrameBuffer::new(config.width, config.height);
    for result in &results {
        frame.write_bucket(result, config.samples_per_pixel);
    }

    let elapsed = start.elapsed();
    let samples = config.width as f64 * config.height as f64 * config.samples_per_pixel as f64;
    log::info!(
        "Rendered in {:.2?} ({:.2} Msamples/s)",
        elapsed,
        samples / elapsed.as_secs_f64().max(1e-9) / 1e6
    );

    Ok(frame)
}
