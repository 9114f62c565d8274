//! Random sampling helpers.
//!
//! Everything draws from a caller-supplied generator so a pixel's samples
//! depend only on that pixel's own stream.

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use raybow_math::{Vec3, Vec3Ext};

/// Golden-ratio increment used to decorrelate per-pixel seeds.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// The generator owned by a single pixel.
///
/// Derived from the render seed and the pixel's row-major index only, so the
/// stream is the same whichever worker renders the pixel.
pub fn pixel_rng(seed: u64, pixel_index: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed ^ pixel_index.wrapping_add(1).wrapping_mul(SEED_MIX))
}

/// Uniform f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    // 24 random mantissa bits
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Uniform f32 in [min, max).
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
pub fn sample_square(rng: &mut dyn RngCore) -> (f32, f32) {
    (gen_f32(rng) - 0.5, gen_f32(rng) - 0.5)
}

/// Uniform point strictly inside the unit sphere (rejection sampling).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.length_squared();
        // Tiny vectors lose precision when normalized
        if len_sq > 1e-6 {
            return p / len_sq.sqrt();
        }
    }
}

/// Uniform point inside the unit disk in the xy plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Cosine-weighted direction about a unit `normal`.
///
/// `normal + unit sphere sample` is distributed with density proportional
/// to the cosine with the normal. Falls back to the normal itself when the
/// two nearly cancel.
pub fn cosine_weighted_about(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let direction = normal + random_unit_vector(rng);
    if direction.near_zero() {
        normal
    } else {
        direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(42)
    }

    #[test]
    fn test_gen_f32_range() {
        let mut rng = rng();
        for _ in 0..10_000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_unit_sphere_and_disk() {
        let mut rng = rng();
        for _ in 0..1_000 {
            assert!(random_in_unit_sphere(&mut rng).length_squared() < 1.0);
            assert!((random_unit_vector(&mut rng).length() - 1.0).abs() < 1e-5);

            let d = random_in_unit_disk(&mut rng);
            assert_eq!(d.z, 0.0);
            assert!(d.length_squared() < 1.0);
        }
    }

    #[test]
    fn test_cosine_weighted_hemisphere() {
        let mut rng = rng();
        let normal = Vec3::Y;
        let n = 20_000;
        let mut mean_cos = 0.0;
        for _ in 0..n {
            let d = cosine_weighted_about(normal, &mut rng).normalize();
            assert!(d.dot(normal) >= -1e-6);
            mean_cos += d.dot(normal);
        }
        // E[cos] under a cosine-weighted hemisphere is 2/3
        mean_cos /= n as f32;
        assert!((mean_cos - 2.0 / 3.0).abs() < 0.02, "mean cos {}", mean_cos);
    }

    #[test]
    fn test_pixel_rng_streams() {
        let mut a = pixel_rng(7, 10);
        let mut b = pixel_rng(7, 10);
        let mut c = pixel_rng(7, 11);
        let mut d = pixel_rng(8, 10);

        let first = a.next_u64();
        assert_eq!(first, b.next_u64());
        assert_ne!(first, c.next_u64());
        assert_ne!(first, d.next_u64());
    }
}
