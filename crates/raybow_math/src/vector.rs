// Vector utilities for Vec3
//
// Extends glam::Vec3 with the reflection/refraction helpers the materials need.

use glam::Vec3;

/// Extension trait for Vec3 to provide scattering utilities
pub trait Vec3Ext {
    /// Mirror `self` about the plane with unit normal `n`.
    fn reflect_about(self, n: Vec3) -> Vec3;

    /// Refract unit vector `self` through a surface with unit normal `n`
    /// (pointing against `self`) using Snell's law.
    ///
    /// `etai_over_etat` is the ratio of refractive indices. The caller is
    /// responsible for detecting total internal reflection first.
    fn refract_through(self, n: Vec3, etai_over_etat: f32) -> Vec3;

    /// True if every component is within 1e-8 of zero.
    fn near_zero(self) -> bool;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn reflect_about(self, n: Vec3) -> Vec3 {
        self - 2.0 * self.dot(n) * n
    }

    #[inline]
    fn refract_through(self, n: Vec3, etai_over_etat: f32) -> Vec3 {
        let cos_theta = (-self).dot(n).min(1.0);
        let r_out_perp = etai_over_etat * (self + cos_theta * n);
        let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
        r_out_perp + r_out_parallel
    }

    #[inline]
    fn near_zero(self) -> bool {
        let s = 1e-8;
        self.x.abs() < s && self.y.abs() < s && self.z.abs() < s
    }
}
