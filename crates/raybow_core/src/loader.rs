//! Scene file loading.
//!
//! Scene files are RON documents deserialized straight into [`SceneDesc`]
//! and validated before they are handed out, so callers never see a scene
//! the renderer would reject.

use std::path::Path;

use ron::extensions::Extensions;
use thiserror::Error;

use crate::scene::SceneDesc;

/// Errors that can occur while loading or generating a scene.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Object {object} references unknown material '{material}'")]
    UnknownMaterial { object: usize, material: String },

    #[error("Object {object} has invalid radius {radius} (must be > 0)")]
    InvalidRadius { object: usize, radius: f32 },

    #[error("Object {object} is a degenerate triangle (zero area)")]
    DegenerateTriangle { object: usize },

    #[error("Material '{material}' has fuzz {fuzz} outside [0, 1]")]
    InvalidFuzz { material: String, fuzz: f32 },

    #[error("Material '{material}' has invalid refraction index {index} (must be > 0)")]
    InvalidRefractionIndex { material: String, index: f32 },

    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Unknown built-in scene '{0}'")]
    UnknownBuiltin(String),

    #[error("Invalid built-in scene parameters: {0}")]
    InvalidBuiltin(String),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load and validate a scene file.
///
/// # Example
///
/// ```ignore
/// use raybow_core::load_scene;
///
/// let scene = load_scene("scenes/spheres.ron")?;
/// println!("Loaded {} objects", scene.object_count());
/// ```
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<SceneDesc> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let scene = load_scene_from_str(&source)?;

    log::info!(
        "Loaded scene {}: {} materials, {} objects",
        path.display(),
        scene.material_count(),
        scene.object_count()
    );

    Ok(scene)
}

/// Parse and validate a scene from RON source text.
///
/// Optional fields may be written bare (`focus_distance: 10.0`).
pub fn load_scene_from_str(source: &str) -> LoadResult<SceneDesc> {
    let scene: SceneDesc = ron::Options::default()
        .with_default_extension(Extensions::IMPLICIT_SOME)
        .from_str(source)?;
    scene.validate()?;
    Ok(scene)
}
