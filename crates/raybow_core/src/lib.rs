//! raybow core - declarative scene descriptions.
//!
//! This crate provides:
//!
//! - **Scene description types**: `SceneDesc`, `CameraDesc`, `MaterialDesc`, `ObjectDesc`
//! - **Scene files**: RON parsing and validation
//! - **Built-in scenes**: seeded procedural generators
//!
//! # Example
//!
//! ```ignore
//! use raybow_core::{load_scene, Builtin, BuiltinParams};
//!
//! // Load a scene file
//! let scene = load_scene("scenes/spheres.ron")?;
//!
//! // Or generate one
//! let scene = Builtin::from_name("grid")?.generate(&BuiltinParams::default())?;
//! println!("{} objects", scene.object_count());
//! ```

pub mod builtin;
pub mod loader;
pub mod scene;

// Re-export commonly used types
pub use builtin::{Builtin, BuiltinParams};
pub use loader::{load_scene, load_scene_from_str, LoadError, LoadResult};
pub use scene::{BackgroundDesc, CameraDesc, MaterialDesc, ObjectDesc, Rgb, SceneDesc};
