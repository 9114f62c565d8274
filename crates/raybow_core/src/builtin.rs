//! Built-in procedural scenes.
//!
//! Generators produce ordinary [`SceneDesc`] values, so a built-in scene goes
//! through exactly the same validation and scene construction as a file.
//! Output is a pure function of the [`BuiltinParams`].

use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use raybow_math::Vec3;

use crate::loader::{LoadError, LoadResult};
use crate::scene::{BackgroundDesc, CameraDesc, MaterialDesc, ObjectDesc, Rgb, SceneDesc};

/// Parameters shared by all generators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuiltinParams {
    /// Number of small spheres along each horizontal axis
    pub spheres_per_axis: u32,
    /// Seed for material and placement randomness
    pub seed: u64,
}

impl Default for BuiltinParams {
    fn default() -> Self {
        Self {
            spheres_per_axis: 11,
            seed: 0,
        }
    }
}

/// The named procedural generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// A regular grid of small spheres cycling through every material kind.
    Grid,
    /// Three large feature spheres over a jittered field of small random ones.
    Cover,
}

impl Builtin {
    /// Every generator name, for help text.
    pub const NAMES: [&'static str; 2] = ["grid", "cover"];

    /// Look up a generator by name.
    pub fn from_name(name: &str) -> LoadResult<Self> {
        match name {
            "grid" => Ok(Builtin::Grid),
            "cover" => Ok(Builtin::Cover),
            other => Err(LoadError::UnknownBuiltin(other.to_string())),
        }
    }

    /// Generate the scene.
    pub fn generate(self, params: &BuiltinParams) -> LoadResult<SceneDesc> {
        if params.spheres_per_axis == 0 {
            return Err(LoadError::InvalidBuiltin(
                "spheres per axis must be at least 1".to_string(),
            ));
        }

        let scene = match self {
            Builtin::Grid => grid(params),
            Builtin::Cover => cover(params),
        };
        scene.validate()?;

        log::info!(
            "Generated built-in scene {:?}: {} materials, {} objects",
            self,
            scene.material_count(),
            scene.object_count()
        );

        Ok(scene)
    }
}

fn ground() -> (ObjectDesc, MaterialDesc) {
    (
        ObjectDesc::Sphere {
            center: Vec3::new(0.0, -1000.0, 0.0),
            radius: 1000.0,
            material: "ground".to_string(),
        },
        MaterialDesc::Lambertian {
            albedo: Rgb::new(0.5, 0.5, 0.5),
        },
    )
}

fn random_diffuse(rng: &mut Xoshiro256PlusPlus) -> MaterialDesc {
    MaterialDesc::Lambertian {
        albedo: Rgb::new(
            rng.gen::<f32>() * rng.gen::<f32>(),
            rng.gen::<f32>() * rng.gen::<f32>(),
            rng.gen::<f32>() * rng.gen::<f32>(),
        ),
    }
}

fn random_metal(rng: &mut Xoshiro256PlusPlus) -> MaterialDesc {
    MaterialDesc::Metal {
        albedo: Rgb::new(
            rng.gen_range(0.5..1.0),
            rng.gen_range(0.5..1.0),
            rng.gen_range(0.5..1.0),
        ),
        fuzz: rng.gen_range(0.0..0.5),
    }
}

fn glass() -> MaterialDesc {
    MaterialDesc::Dielectric {
        refraction_index: 1.5,
    }
}

fn small_sphere(scene: &mut SceneDesc, center: Vec3, material: MaterialDesc) {
    let name = format!("sphere_{}", scene.object_count());
    scene.add_material(name.clone(), material);
    scene.add_object(ObjectDesc::Sphere {
        center,
        radius: 0.2,
        material: name,
    });
}

/// `n x n` spheres on a unit grid centred on the origin, seen from above.
fn grid(params: &BuiltinParams) -> SceneDesc {
    let n = params.spheres_per_axis;
    let extent = n as f32;
    let distance = extent * 1.2 + 3.0;

    let mut scene = SceneDesc::new(CameraDesc {
        position: Vec3::new(0.0, distance * 0.6, distance),
        lookat: Vec3::ZERO,
        up: Vec3::Y,
        vfov: 40.0,
        focus_distance: None,
        aperture: 0.0,
    });
    scene.background = BackgroundDesc::Sky;

    let (ground, ground_material) = ground();
    scene.add_material("ground", ground_material);
    scene.add_object(ground);

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(params.seed);
    let offset = (extent - 1.0) / 2.0;

    for i in 0..n {
        for j in 0..n {
            let center = Vec3::new(i as f32 - offset, 0.2, j as f32 - offset);
            let material = match (i + j) % 3 {
                0 => random_diffuse(&mut rng),
                1 => random_metal(&mut rng),
                _ => glass(),
            };
            small_sphere(&mut scene, center, material);
        }
    }

    scene
}

/// The classic cover arrangement.
fn cover(params: &BuiltinParams) -> SceneDesc {
    let n = params.spheres_per_axis as i32;
    let start = -(n / 2);

    let mut scene = SceneDesc::new(CameraDesc {
        position: Vec3::new(13.0, 2.0, 3.0),
        lookat: Vec3::ZERO,
        up: Vec3::Y,
        vfov: 20.0,
        focus_distance: Some(10.0),
        aperture: 0.1,
    });
    scene.background = BackgroundDesc::Sky;

    let (ground, ground_material) = ground();
    scene.add_material("ground", ground_material);
    scene.add_object(ground);

    let features = [
        ("feature_glass", Vec3::new(0.0, 1.0, 0.0), glass()),
        (
            "feature_diffuse",
            Vec3::new(-4.0, 1.0, 0.0),
            MaterialDesc::Lambertian {
                albedo: Rgb::new(0.4, 0.2, 0.1),
            },
        ),
        (
            "feature_metal",
            Vec3::new(4.0, 1.0, 0.0),
            MaterialDesc::Metal {
                albedo: Rgb::new(0.7, 0.6, 0.5),
                fuzz: 0.0,
            },
        ),
    ];
    for (name, center, material) in features {
        scene.add_material(name, material);
        scene.add_object(ObjectDesc::Sphere {
            center,
            radius: 1.0,
            material: name.to_string(),
        });
    }

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(params.seed);

    for a in start..start + n {
        for b in start..start + n {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            // Keep clear of the metal feature sphere
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let material = if choose_mat < 0.8 {
                random_diffuse(&mut rng)
            } else if choose_mat < 0.95 {
                random_metal(&mut rng)
            } else {
                glass()
            };
            small_sphere(&mut scene, center, material);
        }
    }

    scene
}
