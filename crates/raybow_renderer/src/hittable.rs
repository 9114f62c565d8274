//! Hittable trait and HitRecord for ray-object intersection.

use crate::material::MaterialId;
use raybow_math::{Aabb, Interval, Ray, Vec3};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal at intersection (always points against the ray)
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Material of the surface that was hit
    pub material: MaterialId,
}

impl HitRecord {
    /// Build a record from the geometric outward normal at the hit.
    pub fn new(ray: &Ray, t: f32, p: Vec3, outward_normal: Vec3, material: MaterialId) -> Self {
        let mut rec = Self {
            p,
            normal: outward_normal,
            t,
            front_face: true,
            material,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// A flat list of hittable objects, searched linearly.
///
/// The reference answer for closest-hit queries; the BVH must agree with it.
pub struct HittableList<H> {
    objects: Vec<H>,
    bbox: Aabb,
}

impl<H: Hittable> HittableList<H> {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: H) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Hand the objects over, e.g. to build a BVH.
    pub fn into_objects(self) -> Vec<H> {
        self.objects
    }
}

impl<H: Hittable> Default for HittableList<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Hittable> FromIterator<H> for HittableList<H> {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        let mut list = Self::new();
        for object in iter {
            list.add(object);
        }
        list
    }
}

impl<H: Hittable> Hittable for HittableList<H> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        closest_hit_linear(&self.objects, ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Nearest hit over a slice, tightening the interval after every hit.
pub(crate) fn closest_hit_linear<H: Hittable>(
    objects: &[H],
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord> {
    let mut closest = None;
    let mut closest_so_far = ray_t.max;

    for object in objects {
        if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
            closest_so_far = rec.t;
            closest = Some(rec);
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::Sphere;

    #[test]
    fn test_face_normal() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let front = HitRecord::new(&ray, 4.0, Vec3::new(0.0, 0.0, 1.0), Vec3::Z, MaterialId(0));
        assert!(front.front_face);
        assert_eq!(front.normal, Vec3::Z);

        let back = HitRecord::new(&ray, 6.0, Vec3::new(0.0, 0.0, -1.0), -Vec3::Z, MaterialId(0));
        assert!(!back.front_face);
        assert_eq!(back.normal, Vec3::Z);
    }

    #[test]
    fn test_list_returns_closest() {
        let list: HittableList<Sphere> = [
            Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, MaterialId(0)).unwrap(),
            Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, MaterialId(1)).unwrap(),
            Sphere::new(Vec3::new(0.0, 0.0, -6.0), 1.0, MaterialId(2)).unwrap(),
        ]
        .into_iter()
        .collect();
        assert_eq!(list.len(), 3);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = list.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert_eq!(rec.material, MaterialId(1));
        assert!((rec.t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_list_misses() {
        let list: HittableList<Sphere> = HittableList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(list.is_empty());
        assert!(list.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }
}
