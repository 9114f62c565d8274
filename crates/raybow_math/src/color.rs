//! Linear RGB color helpers.

use crate::Vec3;

/// Color type alias (linear RGB, channels nominally in 0-1).
pub type Color = Vec3;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
///
/// Channels are clamped to [0, 1] after gamma, so over-bright and NaN-free
/// negative values both land in the displayable range.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let to_byte = |c: f32| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

/// Linear interpolation from `a` (t = 0) to `b` (t = 1).
#[inline]
pub fn lerp(a: Color, b: Color, t: f32) -> Color {
    a * (1.0 - t) + b * t
}
