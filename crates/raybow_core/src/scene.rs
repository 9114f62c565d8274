//! Declarative scene description.
//!
//! These types mirror the on-disk scene format one to one and are
//! deliberately renderer-agnostic: the renderer resolves material names to
//! handles and builds its own geometry from a validated [`SceneDesc`].

use std::collections::BTreeMap;
use std::fmt;

use raybow_math::{Color, Vec3};
use serde::de::{self, SeqAccess, Unexpected, Visitor};
use serde::{Deserialize, Deserializer};

use crate::loader::LoadError;

/// An RGB color as written in a scene file.
///
/// Accepts either a `"#RRGGBB"` string (bytes scaled to 0-1) or a `(r, g, b)`
/// float tuple, which may exceed 1 for emitters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(pub Color);

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self(Color::new(r, g, b))
    }

    /// Parse a `#RRGGBB` hex string.
    pub fn from_hex(hex: &str) -> Result<Self, LoadError> {
        let invalid = || LoadError::InvalidColor(hex.to_string());

        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|byte| byte as f32 / 255.0)
                .map_err(|_| invalid())
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn color(self) -> Color {
        self.0
    }
}

struct RgbVisitor;

impl<'de> Visitor<'de> for RgbVisitor {
    type Value = Rgb;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a color in \"#RRGGBB\" format or an (r, g, b) tuple")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Rgb, E> {
        Rgb::from_hex(v).map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Rgb, A::Error> {
        let mut channels = [0.0f32; 3];
        for (i, channel) in channels.iter_mut().enumerate() {
            *channel = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(i, &self))?;
        }
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(4, &self));
        }
        Ok(Rgb::new(channels[0], channels[1], channels[2]))
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RgbVisitor)
    }
}

/// What a ray sees when it leaves the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub enum BackgroundDesc {
    /// White at the horizon fading to light blue straight up.
    #[default]
    Sky,
    /// A constant color in every direction.
    Solid(Rgb),
    /// Vertical gradient by the ray direction's y component.
    Gradient { bottom: Rgb, top: Rgb },
}

fn default_up() -> Vec3 {
    Vec3::Y
}

/// Camera block of a scene file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CameraDesc {
    pub position: Vec3,
    #[serde(default)]
    pub lookat: Vec3,
    #[serde(default = "default_up")]
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Distance to the plane of perfect focus, defaults to `|position - lookat|`.
    /// Scene files may write a bare number instead of `Some(..)`.
    #[serde(default)]
    pub focus_distance: Option<f32>,
    /// Lens diameter; 0 is a pinhole
    #[serde(default)]
    pub aperture: f32,
}

impl CameraDesc {
    /// The focus distance actually used for rendering.
    pub fn resolved_focus_distance(&self) -> f32 {
        self.focus_distance
            .unwrap_or_else(|| (self.position - self.lookat).length())
    }
}

/// A named material definition.
///
/// Tags are snake_case; the capitalised names of older scene files
/// (including the `Dialectric` spelling) are accepted too.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    #[serde(alias = "Lambertian")]
    Lambertian {
        albedo: Rgb,
    },
    #[serde(alias = "Metal")]
    Metal {
        albedo: Rgb,
        #[serde(default)]
        fuzz: f32,
    },
    #[serde(alias = "Dielectric", alias = "Dialectric", alias = "dialectric")]
    Dielectric {
        refraction_index: f32,
    },
    #[serde(alias = "DiffuseLight")]
    DiffuseLight {
        emit: Rgb,
    },
}

/// A geometric object referencing a material by name.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDesc {
    #[serde(alias = "Sphere")]
    Sphere {
        center: Vec3,
        radius: f32,
        material: String,
    },
    #[serde(alias = "Triangle")]
    Triangle {
        vertices: (Vec3, Vec3, Vec3),
        material: String,
    },
}

impl ObjectDesc {
    /// Name of the material this object references.
    pub fn material(&self) -> &str {
        match self {
            ObjectDesc::Sphere { material, .. } | ObjectDesc::Triangle { material, .. } => {
                material
            }
        }
    }
}

/// A complete scene: background, one camera, named materials and objects.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SceneDesc {
    #[serde(default)]
    pub background: BackgroundDesc,

    pub camera: CameraDesc,

    /// Materials keyed by name; sorted so handle assignment is deterministic
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDesc>,

    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
}

impl SceneDesc {
    /// Create an empty scene with the given camera and a sky background.
    pub fn new(camera: CameraDesc) -> Self {
        Self {
            background: BackgroundDesc::default(),
            camera,
            materials: BTreeMap::new(),
            objects: Vec::new(),
        }
    }

    /// Register a material under `name`, replacing any previous definition.
    pub fn add_material(&mut self, name: impl Into<String>, material: MaterialDesc) {
        self.materials.insert(name.into(), material);
    }

    /// Add an object to the scene.
    pub fn add_object(&mut self, object: ObjectDesc) {
        self.objects.push(object);
    }

    /// Get object count.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Get material count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Check every invariant the renderer relies on.
    ///
    /// A scene that passes can be turned into a render scene without
    /// further failure.
    pub fn validate(&self) -> Result<(), LoadError> {
        self.validate_camera()?;

        for (name, material) in &self.materials {
            match material {
                MaterialDesc::Metal { fuzz, .. } if !(0.0..=1.0).contains(fuzz) => {
                    return Err(LoadError::InvalidFuzz {
                        material: name.clone(),
                        fuzz: *fuzz,
                    });
                }
                MaterialDesc::Dielectric { refraction_index }
                    if !(refraction_index.is_finite() && *refraction_index > 0.0) =>
                {
                    return Err(LoadError::InvalidRefractionIndex {
                        material: name.clone(),
                        index: *refraction_index,
                    });
                }
                _ => {}
            }
        }

        for (index, object) in self.objects.iter().enumerate() {
            if !self.materials.contains_key(object.material()) {
                return Err(LoadError::UnknownMaterial {
                    object: index,
                    material: object.material().to_string(),
                });
            }

            match object {
                ObjectDesc::Sphere { radius, .. } => {
                    if !(radius.is_finite() && *radius > 0.0) {
                        return Err(LoadError::InvalidRadius {
                            object: index,
                            radius: *radius,
                        });
                    }
                }
                ObjectDesc::Triangle { vertices: (a, b, c), .. } => {
                    if (*b - *a).cross(*c - *a).length_squared() <= f32::EPSILON * f32::EPSILON {
                        return Err(LoadError::DegenerateTriangle { object: index });
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_camera(&self) -> Result<(), LoadError> {
        let camera = &self.camera;
        let view = camera.lookat - camera.position;

        if view.length_squared() == 0.0 {
            return Err(LoadError::InvalidCamera(
                "position and lookat coincide".to_string(),
            ));
        }
        if view.cross(camera.up).length_squared() == 0.0 {
            return Err(LoadError::InvalidCamera(
                "up vector is parallel to the view direction".to_string(),
            ));
        }
        if !(camera.vfov > 0.0 && camera.vfov < 180.0) {
            return Err(LoadError::InvalidCamera(format!(
                "vfov must be in (0, 180) degrees, got {}",
                camera.vfov
            )));
        }
        if !(camera.aperture >= 0.0) {
            return Err(LoadError::InvalidCamera(format!(
                "aperture must be non-negative, got {}",
                camera.aperture
            )));
        }
        if let Some(focus) = camera.focus_distance {
            if !(focus > 0.0) {
                return Err(LoadError::InvalidCamera(format!(
                    "focus distance must be positive, got {}",
                    focus
                )));
            }
        }

        Ok(())
    }
}
