//! raybow command line renderer.
//!
//! Loads a scene file (or generates a built-in scene), renders it and writes
//! the image in the format named by the output file's extension.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use raybow_core::{load_scene, Builtin, BuiltinParams, SceneDesc};
use raybow_renderer::{render, Background, Camera, RenderConfig, Scene, DEFAULT_BUCKET_SIZE};

/// Prefix that selects a procedural scene instead of a file.
const BUILTIN_PREFIX: &str = "builtin:";

/// Command line options.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Render a scene with the raybow path tracer", long_about = None)]
struct Options {
    /// Scene file (RON), or `builtin:grid` / `builtin:cover`.
    scene: String,

    /// Image width in pixels.
    width: u32,

    /// Image height in pixels.
    height: u32,

    /// Samples traced through every pixel.
    #[arg(short = 'r', long = "rays-per-pixel", value_name = "NUM", default_value_t = 100)]
    rays_per_pixel: u32,

    /// Maximum number of bounces per path.
    #[arg(short = 'd', long, value_name = "NUM", default_value_t = 50)]
    max_depth: u32,

    /// Output image; the extension picks the format (png, ppm, ...).
    #[arg(short = 'o', long, value_name = "FILE", default_value = "output.png")]
    output: PathBuf,

    /// Seed for sampling and built-in scene generation.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Worker threads (defaults to one per logical core).
    #[arg(short = 't', long, value_name = "NUM")]
    threads: Option<usize>,

    /// Small spheres per axis in built-in scenes.
    #[arg(long, value_name = "NUM", default_value_t = 11)]
    spheres_per_axis: u32,

    /// Edge length in pixels of the square render buckets.
    #[arg(long, value_name = "PIXELS", default_value_t = DEFAULT_BUCKET_SIZE)]
    bucket_size: u32,
}

impl Options {
    fn render_config(&self, background: Background) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            samples_per_pixel: self.rays_per_pixel,
            max_depth: self.max_depth,
            background,
            seed: self.seed,
            threads: self.threads,
            bucket_size: self.bucket_size,
        }
    }
}

/// Resolve the scene argument to a description.
fn load_scene_desc(options: &Options) -> Result<SceneDesc> {
    match options.scene.strip_prefix(BUILTIN_PREFIX) {
        Some(name) => {
            let builtin = Builtin::from_name(name).with_context(|| {
                format!("available built-in scenes: {}", Builtin::NAMES.join(", "))
            })?;
            let params = BuiltinParams {
                spheres_per_axis: options.spheres_per_axis,
                seed: options.seed,
            };
            Ok(builtin.generate(&params)?)
        }
        None => load_scene(&options.scene)
            .with_context(|| format!("failed to load scene {}", options.scene)),
    }
}

fn save_image(path: &Path, image: &raybow_renderer::RenderedImage) -> Result<()> {
    image::save_buffer(
        path,
        image.as_bytes(),
        image.width(),
        image.height(),
        image::ColorType::Rgb8,
    )
    .with_context(|| format!("failed to write {}", path.display()))
}

fn run(options: &Options) -> Result<()> {
    let desc = load_scene_desc(options)?;

    let config = options.render_config(Background::from(&desc.background));
    config.validate()?;

    let camera = Camera::from_desc(&desc.camera, config.aspect_ratio())?;
    let scene = Scene::from_desc(&desc)?;

    let start = Instant::now();
    let image = render(&scene, &camera, &config)?.finalize();
    save_image(&options.output, &image)?;

    log::info!(
        "Wrote {} ({}x{}) in {:.2?}",
        options.output.display(),
        image.width(),
        image.height(),
        start.elapsed()
    );
    Ok(())
}

/// Logger at `info` unless the environment's filter says otherwise.
fn logger(env: env_logger::Env<'_>) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or("info"))
}

fn main() -> Result<()> {
    logger(env_logger::Env::default()).init();

    let options = Options::parse();
    log::info!("Starting raybow {}", env!("CARGO_PKG_VERSION"));

    run(&options)
}
