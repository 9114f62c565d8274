//! What escaped rays see.

use raybow_core::BackgroundDesc;
use raybow_math::{lerp, Color, Vec3};

/// Radiance returned by rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// The same color in every direction.
    Solid(Color),
    /// Blend by the normalized direction's y: `bottom` straight down, `top` straight up.
    Gradient { bottom: Color, top: Color },
}

impl Background {
    /// White fading to light blue overhead.
    pub const SKY: Background = Background::Gradient {
        bottom: Color::ONE,
        top: Color::new(0.5, 0.7, 1.0),
    };

    /// Radiance arriving from `direction` (need not be normalized).
    #[inline]
    pub fn sample(&self, direction: Vec3) -> Color {
        match *self {
            Background::Solid(color) => color,
            Background::Gradient { bottom, top } => {
                let a = 0.5 * (direction.normalize().y + 1.0);
                lerp(bottom, top, a)
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::SKY
    }
}

impl From<&BackgroundDesc> for Background {
    fn from(desc: &BackgroundDesc) -> Self {
        match *desc {
            BackgroundDesc::Sky => Background::SKY,
            BackgroundDesc::Solid(color) => Background::Solid(color.color()),
            BackgroundDesc::Gradient { bottom, top } => Background::Gradient {
                bottom: bottom.color(),
                top: top.color(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raybow_core::Rgb;

    #[test]
    fn test_sky_gradient() {
        let up = Background::SKY.sample(Vec3::new(0.0, 3.0, 0.0));
        let down = Background::SKY.sample(Vec3::new(0.0, -1.0, 0.0));
        let horizon = Background::SKY.sample(Vec3::X);

        assert!((up - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);
        assert!((down - Color::ONE).length() < 1e-6);
        assert!((horizon - Color::new(0.75, 0.85, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_solid_ignores_direction() {
        let bg = Background::Solid(Color::new(0.1, 0.2, 0.3));
        assert_eq!(bg.sample(Vec3::X), bg.sample(-Vec3::Y));
    }

    #[test]
    fn test_from_desc() {
        assert_eq!(Background::from(&BackgroundDesc::Sky), Background::SKY);
        assert_eq!(
            Background::from(&BackgroundDesc::Solid(Rgb::new(1.0, 0.0, 0.0))),
            Background::Solid(Color::new(1.0, 0.0, 0.0))
        );
    }
}
