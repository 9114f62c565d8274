//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::error::{RenderError, RenderResult};
use crate::hittable::{HitRecord, Hittable};
use crate::material::MaterialId;
use raybow_math::{Aabb, Interval, Ray, Vec3};

/// A single-sided-geometry, double-sided-shading triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    v0: Vec3,
    /// v1 - v0
    edge1: Vec3,
    /// v2 - v0
    edge2: Vec3,
    /// Unit face normal, wound counter-clockwise
    normal: Vec3,
    material: MaterialId,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// Fails when the vertices are collinear or coincide.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: MaterialId) -> RenderResult<Self> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let cross = edge1.cross(edge2);
        if !(cross.length_squared() > f32::EPSILON * f32::EPSILON) {
            return Err(RenderError::DegenerateTriangle);
        }

        // Aabb::new pads the flat axis
        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);

        Ok(Self {
            v0,
            edge1,
            edge2,
            normal: cross.normalize(),
            material,
            bbox: Aabb::from_points(min, max),
        })
    }

    /// The three vertices in winding order.
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v0 + self.edge1, self.v0 + self.edge2]
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let h = ray.direction().cross(self.edge2);
        let a = self.edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(self.edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(HitRecord::new(ray, t, ray.at(t), self.normal, self.material))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Interval = Interval {
        min: 0.001,
        max: f32::INFINITY,
    };

    fn xy_triangle() -> Triangle {
        // Triangle in XY plane at z=-1
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            MaterialId(3),
        )
        .unwrap()
    }

    #[test]
    fn test_triangle_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = xy_triangle().hit(&ray, T).unwrap();

        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert_eq!(rec.material, MaterialId(3));
    }

    #[test]
    fn test_triangle_back_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        let rec = xy_triangle().hit(&ray, T).unwrap();

        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Z);
    }

    #[test]
    fn test_triangle_miss() {
        // Ray pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(xy_triangle().hit(&ray, T).is_none());

        // Passes beside the triangle
        let ray = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(xy_triangle().hit(&ray, T).is_none());

        // Parallel to the plane
        let ray = Ray::new(Vec3::new(-5.0, 0.0, -1.0), Vec3::X);
        assert!(xy_triangle().hit(&ray, T).is_none());
    }

    #[test]
    fn test_triangle_bbox_is_padded() {
        let bbox = xy_triangle().bounding_box();
        assert!(bbox.z.size() > 0.0);
        assert!(bbox.contains_point(Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_degenerate_triangle() {
        let result = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0, MaterialId(0));
        assert!(matches!(result, Err(RenderError::DegenerateTriangle)));
    }
}
