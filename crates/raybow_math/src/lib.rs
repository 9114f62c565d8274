// Re-export glam for convenience
pub use glam::*;

// raybow math types
mod aabb;
mod color;
mod interval;
mod ray;
mod vector;

pub use aabb::Aabb;
pub use color::{color_to_rgb8, lerp, linear_to_gamma, Color};
pub use interval::Interval;
pub use ray::Ray;
pub use vector::Vec3Ext;
