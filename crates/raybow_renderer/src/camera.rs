//! Camera for ray generation.
//!
//! A thin-lens camera: with zero aperture every ray starts at the eye point
//! and the camera never touches the random generator.

use crate::error::{RenderError, RenderResult};
use crate::sampling::random_in_unit_disk;
use rand::RngCore;
use raybow_core::CameraDesc;
use raybow_math::{Ray, Vec3};

/// Camera for generating rays into the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    origin: Vec3,
    /// Point on the focus plane seen at (s, t) = (0, 0)
    upper_left: Vec3,
    /// Full viewport width on the focus plane, left to right
    horizontal: Vec3,
    /// Full viewport height on the focus plane, top to bottom
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

/// Collects camera parameters and validates them in [`CameraBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct CameraBuilder {
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,
    vfov: f32,
    aspect_ratio: f32,
    aperture: f32,
    focus_dist: Option<f32>,
}

impl Default for CameraBuilder {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: None,
        }
    }
}

impl CameraBuilder {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    ///
    /// - `vfov`: vertical field of view in degrees
    /// - `aperture`: lens diameter, 0 for a pinhole
    /// - `focus_dist`: distance to the plane of perfect focus, `None` for `|look_from - look_at|`
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: Option<f32>) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the image aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Validate the parameters and compute the camera frame.
    pub fn build(self) -> RenderResult<Camera> {
        let view = self.look_at - self.look_from;
        if !(view.length_squared() > 0.0) {
            return Err(RenderError::DegenerateCamera("position and look-at coincide"));
        }
        if !(view.cross(self.vup).length_squared() > 0.0) {
            return Err(RenderError::DegenerateCamera(
                "up vector is parallel to the view direction",
            ));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(RenderError::DegenerateCamera("vertical fov must be in (0, 180) degrees"));
        }
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            return Err(RenderError::DegenerateCamera("aspect ratio must be positive"));
        }
        if !(self.aperture >= 0.0) {
            return Err(RenderError::DegenerateCamera("aperture must be non-negative"));
        }

        let focus_dist = self.focus_dist.unwrap_or_else(|| view.length());
        if !(focus_dist > 0.0) {
            return Err(RenderError::DegenerateCamera("focus distance must be positive"));
        }

        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * self.aspect_ratio;

        // Calculate camera basis vectors
        let w = -view.normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        let horizontal = focus_dist * viewport_width * u;
        let vertical = -focus_dist * viewport_height * v;
        let upper_left = self.look_from - focus_dist * w - horizontal / 2.0 - vertical / 2.0;

        Ok(Camera {
            origin: self.look_from,
            upper_left,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: self.aperture / 2.0,
        })
    }
}

impl Camera {
    /// Start configuring a camera.
    pub fn builder() -> CameraBuilder {
        CameraBuilder::default()
    }

    /// Camera described by a scene file, for an image of the given aspect ratio.
    pub fn from_desc(desc: &CameraDesc, aspect_ratio: f32) -> RenderResult<Self> {
        Self::builder()
            .with_position(desc.position, desc.lookat, desc.up)
            .with_lens(desc.vfov, desc.aperture, desc.focus_distance)
            .with_aspect_ratio(aspect_ratio)
            .build()
    }

    /// Generate a ray through normalized image coordinates.
    ///
    /// `s` runs left to right and `t` top to bottom, both over [0, 1].
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let origin = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.origin + self.u * rd.x + self.v * rd.y
        } else {
            self.origin
        };

        let target = self.upper_left + s * self.horizontal + t * self.vertical;
        Ray::new(origin, target - origin)
    }

    /// The eye point (lens centre).
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        -self.w
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}
