//! Surface materials.
//!
//! Materials are a closed set of variants held in the scene's registry and
//! referenced from geometry by [`MaterialId`]. Each variant either scatters
//! an incoming ray (with an attenuation) or absorbs it.

use crate::error::{RenderError, RenderResult};
use crate::hittable::HitRecord;
use crate::sampling::{cosine_weighted_about, gen_f32, random_in_unit_sphere};
use rand::RngCore;
use raybow_math::{Color, Ray, Vec3Ext};

/// Handle to a material registered with a [`Scene`](crate::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

impl MaterialId {
    /// Index into the scene's material table.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Per-channel multiplier applied to the light carried back along `scattered`
    pub attenuation: Color,
    /// The continuation ray, starting at the hit point
    pub scattered: Ray,
}

/// A surface material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Ideal diffuse reflector.
    Lambertian { albedo: Color },
    /// Mirror-like reflector; `fuzz` in [0, 1] perturbs the reflected direction.
    Metal { albedo: Color, fuzz: f32 },
    /// Clear refractive material such as glass.
    Dielectric { refraction_index: f32 },
    /// Emitter; never scatters.
    DiffuseLight { emit: Color },
}

impl Material {
    /// Create a Lambertian material with the given albedo.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian { albedo }
    }

    /// Create a metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough. Clamped to [0, 1].
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        let clamped = fuzz.clamp(0.0, 1.0);
        if clamped != fuzz {
            log::warn!("Metal fuzz {} clamped to {}", fuzz, clamped);
        }
        Material::Metal {
            albedo,
            fuzz: clamped,
        }
    }

    /// Create a dielectric material.
    ///
    /// `refraction_index` is relative to the surrounding medium (1.0 = air, 1.5 = glass)
    /// and must be a finite value > 0.
    pub fn dielectric(refraction_index: f32) -> RenderResult<Self> {
        if !(refraction_index > 0.0 && refraction_index.is_finite()) {
            return Err(RenderError::InvalidRefractionIndex(refraction_index));
        }
        Ok(Material::Dielectric { refraction_index })
    }

    /// Create a diffuse emitter.
    pub fn diffuse_light(emit: Color) -> Self {
        Material::DiffuseLight { emit }
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match *self {
            Material::Lambertian { albedo } => Some(ScatterResult {
                attenuation: albedo,
                scattered: Ray::new(rec.p, cosine_weighted_about(rec.normal, rng)),
            }),
            Material::Metal { albedo, fuzz } => {
                let reflected = ray_in.direction().normalize().reflect_about(rec.normal);
                let direction = reflected + fuzz * random_in_unit_sphere(rng);

                // Fuzz can push the reflection below the surface
                if direction.dot(rec.normal) > 0.0 {
                    Some(ScatterResult {
                        attenuation: albedo,
                        scattered: Ray::new(rec.p, direction),
                    })
                } else {
                    None
                }
            }
            Material::Dielectric { refraction_index } => {
                let ratio = if rec.front_face {
                    1.0 / refraction_index
                } else {
                    refraction_index
                };

                let unit_direction = ray_in.direction().normalize();
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

                let cannot_refract = ratio * sin_theta > 1.0;
                let direction =
                    if cannot_refract || reflectance(cos_theta, ratio) > gen_f32(rng) {
                        unit_direction.reflect_about(rec.normal)
                    } else {
                        unit_direction.refract_through(rec.normal, ratio)
                    };

                Some(ScatterResult {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction),
                })
            }
            Material::DiffuseLight { .. } => None,
        }
    }

    /// Light emitted by the surface itself.
    pub fn emitted(&self) -> Color {
        match *self {
            Material::DiffuseLight { emit } => emit,
            _ => Color::ZERO,
        }
    }
}

/// Schlick's approximation for reflectance.
pub fn reflectance(cosine: f32, ratio: f32) -> f32 {
    let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use raybow_math::Vec3;

    fn hit_at_origin(ray: &Ray, outward_normal: Vec3) -> HitRecord {
        HitRecord::new(ray, 1.0, Vec3::ZERO, outward_normal, MaterialId(0))
    }

    #[test]
    fn test_lambertian_scatters_into_upper_hemisphere() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let material = Material::lambertian(Color::new(0.8, 0.3, 0.3));
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, -1.0, 0.0));
        let rec = hit_at_origin(&ray, Vec3::Y);

        for _ in 0..1_000 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.3));
            assert_eq!(result.scattered.origin(), rec.p);
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
            assert!(result.scattered.direction().length_squared() > 0.0);
        }
    }

    #[test]
    fn test_mirror_metal_reflects_exactly() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let material = Material::metal(Color::ONE, 0.0);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let rec = hit_at_origin(&ray, Vec3::Y);

        let result = material.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-5);
    }

    #[test]
    fn test_fuzzy_metal_never_scatters_below_surface() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let material = Material::metal(Color::ONE, 1.0);
        // Grazing incidence makes absorption common
        let ray = Ray::new(Vec3::new(-1.0, 0.05, 0.0), Vec3::new(1.0, -0.05, 0.0));
        let rec = hit_at_origin(&ray, Vec3::Y);

        let mut absorbed = 0;
        for _ in 0..1_000 {
            match material.scatter(&ray, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(rec.normal) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_metal_absorbs_exactly_below_surface() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
        let fuzz = 0.8;
        let material = Material::metal(Color::ONE, fuzz);
        let ray = Ray::new(Vec3::new(-1.0, 0.2, 0.0), Vec3::new(1.0, -0.2, 0.0));
        let rec = hit_at_origin(&ray, Vec3::Y);
        let reflected = ray.direction().normalize().reflect_about(rec.normal);

        for _ in 0..1_000 {
            // Replay the same draw the material is about to make
            let mut replay = rng.clone();
            let perturbed = reflected + fuzz * random_in_unit_sphere(&mut replay);

            let result = material.scatter(&ray, &rec, &mut rng);
            assert_eq!(result.is_none(), perturbed.dot(rec.normal) <= 0.0);
        }
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(
            Material::metal(Color::ONE, 3.0),
            Material::Metal {
                albedo: Color::ONE,
                fuzz: 1.0
            }
        );
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        let material = Material::dielectric(1.5).unwrap();

        // Leaving glass at 60 degrees: 1.5 * sin(60) > 1
        let direction = Vec3::new(60f32.to_radians().sin(), 60f32.to_radians().cos(), 0.0);
        let ray = Ray::new(Vec3::ZERO - direction, direction);
        // Outward normal along the ray, so this is a back-face hit
        let rec = hit_at_origin(&ray, Vec3::Y);
        assert!(!rec.front_face);

        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
            let reflected = direction.reflect_about(rec.normal);
            assert!((result.scattered.direction() - reflected).length() < 1e-5);
        }
    }

    #[test]
    fn test_dielectric_refracts_at_normal_incidence() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let material = Material::dielectric(1.5).unwrap();
        let ray = Ray::new(Vec3::Y, -Vec3::Y);
        let rec = hit_at_origin(&ray, Vec3::Y);

        // Normal-incidence reflectance for glass is 4%
        let mut refracted = 0;
        for _ in 0..1_000 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            if result.scattered.direction().dot(Vec3::Y) < 0.0 {
                assert!((result.scattered.direction() + Vec3::Y).length() < 1e-5);
                refracted += 1;
            }
        }
        assert!(refracted > 900, "refracted {}", refracted);
    }

    #[test]
    fn test_dielectric_rejects_invalid_index() {
        for index in [0.0, -1.5, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                Material::dielectric(index),
                Err(RenderError::InvalidRefractionIndex(_))
            ));
        }
        assert!(Material::dielectric(1.0).is_ok());
    }

    #[test]
    fn test_reflectance_limits() {
        assert!((reflectance(1.0, 1.0 / 1.5) - 0.04).abs() < 1e-3);
        assert!((reflectance(0.0, 1.0 / 1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_diffuse_light_emits_and_absorbs() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(6);
        let light = Material::diffuse_light(Color::new(4.0, 4.0, 4.0));
        let ray = Ray::new(Vec3::Y, -Vec3::Y);
        let rec = hit_at_origin(&ray, Vec3::Y);

        assert!(light.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(light.emitted(), Color::new(4.0, 4.0, 4.0));
        assert_eq!(Material::lambertian(Color::ONE).emitted(), Color::ZERO);
    }
}
