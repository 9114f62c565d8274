//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of axis-aligned boxes over the scene's primitives. Traversal
//! visits the nearer child first and shrinks the search interval after every
//! hit, so it returns exactly the hit a linear scan would.

use crate::hittable::{closest_hit_linear, HitRecord, Hittable};
use raybow_math::{Aabb, Interval, Ray};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
pub enum BvhNode<H> {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode<H>>,
        right: Box<BvhNode<H>>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf { objects: Vec<H>, bbox: Aabb },
    /// A tree over no primitives. Never hit.
    Empty,
}

impl<H: Hittable> BvhNode<H> {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<H>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(objects)
    }

    /// Recursive BVH construction.
    ///
    /// Median split: partition around the median centroid on the axis where
    /// the centroids spread the most, then recurse on both halves.
    fn build(mut objects: Vec<H>) -> Self {
        let n = objects.len();

        let bounds = objects.iter().fold(Aabb::EMPTY, |acc, o| {
            Aabb::surrounding(&acc, &o.bounding_box())
        });

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        let mid = n / 2;
        objects.select_nth_unstable_by(mid, |a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.total_cmp(&b_val)
        });

        let right_objects = objects.split_off(mid);
        let left = Self::build(objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of primitives stored in the leaves.
    pub fn primitive_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { objects, .. } => objects.len(),
            BvhNode::Branch { left, right, .. } => {
                left.primitive_count() + right.primitive_count()
            }
        }
    }

    /// Search a node whose own box is already known to be hit.
    ///
    /// Hits must be strictly closer than the best so far, so on an exact tie
    /// in `t` the first surface visited wins. For the tree that is near-child
    /// order, which can differ from a linear scan's list order; both return
    /// the same `t` and point.
    fn hit_inside(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { objects, .. } => closest_hit_linear(objects, ray, ray_t),

            BvhNode::Branch { left, right, .. } => {
                let left_entry = left.bounding_box().hit_distance(ray, ray_t);
                let right_entry = right.bounding_box().hit_distance(ray, ray_t);

                let mut order = [(left_entry, left), (right_entry, right)];
                if right_entry.unwrap_or(f32::INFINITY) < left_entry.unwrap_or(f32::INFINITY) {
                    order.swap(0, 1);
                }

                let mut closest: Option<HitRecord> = None;
                for (entry, child) in order {
                    let Some(entry) = entry else { continue };

                    // Nothing in a box entered beyond the current hit can be closer
                    let t_max = closest.map_or(ray_t.max, |rec| rec.t);
                    if entry >= t_max {
                        continue;
                    }

                    if let Some(rec) = child.hit_inside(ray, ray_t.with_max(t_max)) {
                        closest = Some(rec);
                    }
                }
                closest
            }
        }
    }
}

impl<H: Hittable> Hittable for BvhNode<H> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        if !self.bounding_box().hit(ray, ray_t) {
            return None;
        }
        self.hit_inside(ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::HittableList;
    use crate::material::MaterialId;
    use crate::primitive::Primitive;
    use crate::sphere::Sphere;
    use crate::triangle::Triangle;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;
    use raybow_math::Vec3;

    const T: Interval = Interval {
        min: 0.001,
        max: f32::INFINITY,
    };

    fn random_point(rng: &mut Xoshiro256PlusPlus, extent: f32) -> Vec3 {
        Vec3::new(
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
        )
    }

    fn random_scene(rng: &mut Xoshiro256PlusPlus, count: usize) -> Vec<Primitive> {
        let mut primitives = Vec::with_capacity(count);
        while primitives.len() < count {
            let material = MaterialId(primitives.len());
            if rng.gen_bool(0.7) {
                let center = random_point(rng, 10.0);
                let radius = rng.gen_range(0.1..1.5);
                primitives.push(Sphere::new(center, radius, material).unwrap().into());
            } else {
                let a = random_point(rng, 10.0);
                let b = a + random_point(rng, 2.0);
                let c = a + random_point(rng, 2.0);
                if let Ok(triangle) = Triangle::new(a, b, c, material) {
                    primitives.push(triangle.into());
                }
            }
        }
        primitives
    }

    #[test]
    fn test_bvh_empty() {
        let bvh: BvhNode<Primitive> = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));
        assert_eq!(bvh.node_count(), 0);

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(bvh.hit(&ray, T).is_none());
    }

    #[test]
    fn test_bvh_single_sphere() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MaterialId(0)).unwrap();
        let bvh = BvhNode::new(vec![sphere]);

        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(bvh.hit(&ray, T).is_some());
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Sphere> = (0..10)
            .map(|i| Sphere::new(Vec3::new(i as f32, 0.0, -5.0), 0.5, MaterialId(i)).unwrap())
            .collect();
        let bvh = BvhNode::new(spheres);

        assert_eq!(bvh.primitive_count(), 10);
        assert!(bvh.depth() > 1);

        // Ray that hits sphere at x=5
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = bvh.hit(&ray, T).unwrap();
        assert_eq!(rec.material, MaterialId(5));
        assert!((rec.p.z - (-4.5)).abs() < 0.01);
    }

    #[test]
    fn test_bvh_prefers_nearer_child_hit() {
        // A row of spheres along the ray; the first one must win from either end
        let spheres: Vec<Sphere> = (0..20)
            .map(|i| Sphere::new(Vec3::new(0.0, 0.0, -2.0 * i as f32), 0.5, MaterialId(i)).unwrap())
            .collect();
        let bvh = BvhNode::new(spheres);

        let forward = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        assert_eq!(bvh.hit(&forward, T).unwrap().material, MaterialId(0));

        let backward = Ray::new(Vec3::new(0.0, 0.0, -50.0), Vec3::Z);
        assert_eq!(bvh.hit(&backward, T).unwrap().material, MaterialId(19));
    }

    #[test]
    fn test_bvh_coincident_surfaces_tie_on_distance() {
        // Two identical spheres in the middle of a row, with different materials
        let mut spheres: Vec<Sphere> = (0..8)
            .map(|i| Sphere::new(Vec3::new(2.0 * i as f32, 0.0, -5.0), 0.5, MaterialId(i)).unwrap())
            .collect();
        spheres.push(Sphere::new(Vec3::new(6.0, 0.0, -5.0), 0.5, MaterialId(8)).unwrap());

        let list: HittableList<Sphere> = spheres.iter().copied().collect();
        let bvh = BvhNode::new(spheres);
        assert!(bvh.depth() > 1);

        let ray = Ray::new(Vec3::new(6.0, 0.0, 0.0), -Vec3::Z);
        let expected = list.hit(&ray, T).unwrap();
        let actual = bvh.hit(&ray, T).unwrap();

        assert_eq!(expected.material, MaterialId(3));
        assert!(actual.material == MaterialId(3) || actual.material == MaterialId(8));
        assert_eq!(actual.t, expected.t);
        assert_eq!(actual.p, expected.p);
        assert_eq!(actual.normal, expected.normal);

        // The tree always resolves the tie the same way
        for _ in 0..10 {
            assert_eq!(bvh.hit(&ray, T).unwrap(), actual);
        }
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2024);

        for count in [1, 5, 17, 64, 300] {
            let primitives = random_scene(&mut rng, count);
            let list: HittableList<Primitive> = primitives.iter().copied().collect();
            let bvh = BvhNode::new(primitives);
            assert_eq!(bvh.primitive_count(), count);

            for _ in 0..2_000 {
                let origin = random_point(&mut rng, 15.0);
                let direction = random_point(&mut rng, 1.0);
                if direction.length_squared() < 1e-4 {
                    continue;
                }
                let ray = Ray::new(origin, direction);

                let expected = list.hit(&ray, T);
                let actual = bvh.hit(&ray, T);
                assert_eq!(actual, expected, "ray {:?} over {} primitives", ray, count);
            }
        }
    }
}
