//! Errors raised while building a render.
//!
//! Every variant is detected before any pixel work starts; once sampling has
//! begun a render always runs to completion.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("Max bounce depth must be at least 1")]
    ZeroDepth,

    #[error("Bucket size must be at least 1")]
    ZeroBucketSize,

    #[error("Sphere radius must be > 0, got {0}")]
    InvalidRadius(f32),

    #[error("Refraction index must be > 0, got {0}")]
    InvalidRefractionIndex(f32),

    #[error("Degenerate triangle (zero area)")]
    DegenerateTriangle,

    #[error("Unknown material '{0}'")]
    UnknownMaterial(String),

    #[error("Material handle {0} is not registered with the scene")]
    InvalidMaterialId(usize),

    #[error("Degenerate camera: {0}")]
    DegenerateCamera(&'static str),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for render setup.
pub type RenderResult<T> = Result<T, RenderError>;
