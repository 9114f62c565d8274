//! Render-ready scene: material registry plus a BVH over the primitives.

use std::collections::HashMap;
use std::time::Instant;

use crate::bvh::BvhNode;
use crate::error::{RenderError, RenderResult};
use crate::hittable::{HitRecord, Hittable};
use crate::material::{Material, MaterialId};
use crate::primitive::Primitive;
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use raybow_core::{MaterialDesc, ObjectDesc, SceneDesc};
use raybow_math::{Interval, Ray, Vec3};

/// Immutable scene shared by every render worker.
pub struct Scene {
    materials: Vec<Material>,
    bvh: BvhNode<Primitive>,
}

/// Accumulates materials and geometry before the BVH is built.
#[derive(Default)]
pub struct SceneBuilder {
    materials: Vec<Material>,
    primitives: Vec<Primitive>,
}

impl SceneBuilder {
    /// Register a material and get its handle.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Add a sphere.
    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: MaterialId) -> RenderResult<()> {
        self.add(Sphere::new(center, radius, material)?)
    }

    /// Add a triangle.
    pub fn add_triangle(&mut self, vertices: [Vec3; 3], material: MaterialId) -> RenderResult<()> {
        let [a, b, c] = vertices;
        self.add(Triangle::new(a, b, c, material)?)
    }

    /// Add any primitive whose material is already registered.
    pub fn add(&mut self, primitive: impl Into<Primitive>) -> RenderResult<()> {
        let primitive = primitive.into();
        let material = match &primitive {
            Primitive::Sphere(sphere) => sphere.material(),
            Primitive::Triangle(triangle) => triangle.material(),
        };
        if material.index() >= self.materials.len() {
            return Err(RenderError::InvalidMaterialId(material.index()));
        }
        self.primitives.push(primitive);
        Ok(())
    }

    /// Build the BVH and freeze the scene.
    pub fn build(self) -> Scene {
        let start = Instant::now();
        let primitive_count = self.primitives.len();
        let bvh = BvhNode::new(self.primitives);

        log::info!(
            "Built BVH over {} primitives: {} nodes, depth {} in {:.2?}",
            primitive_count,
            bvh.node_count(),
            bvh.depth(),
            start.elapsed()
        );

        Scene {
            materials: self.materials,
            bvh,
        }
    }
}

impl Scene {
    /// Start assembling a scene.
    pub fn builder() -> SceneBuilder {
        SceneBuilder::default()
    }

    /// Resolve a scene description into render primitives.
    ///
    /// Material names become handles in the description's (sorted) order.
    pub fn from_desc(desc: &SceneDesc) -> RenderResult<Self> {
        let mut builder = Scene::builder();
        let mut handles = HashMap::with_capacity(desc.materials.len());

        for (name, material) in &desc.materials {
            let material = match *material {
                MaterialDesc::Lambertian { albedo } => Material::lambertian(albedo.color()),
                MaterialDesc::Metal { albedo, fuzz } => Material::metal(albedo.color(), fuzz),
                MaterialDesc::Dielectric { refraction_index } => {
                    Material::dielectric(refraction_index)?
                }
                MaterialDesc::DiffuseLight { emit } => Material::diffuse_light(emit.color()),
            };
            handles.insert(name.as_str(), builder.add_material(material));
        }

        for object in &desc.objects {
            let material = *handles
                .get(object.material())
                .ok_or_else(|| RenderError::UnknownMaterial(object.material().to_string()))?;

            match *object {
                ObjectDesc::Sphere { center, radius, .. } => {
                    builder.add_sphere(center, radius, material)?
                }
                ObjectDesc::Triangle {
                    vertices: (a, b, c),
                    ..
                } => builder.add_triangle([a, b, c], material)?,
            }
        }

        Ok(builder.build())
    }

    /// Nearest surface hit by `ray` with `t` inside `ray_t`.
    #[inline]
    pub fn closest_hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.bvh.hit(ray, ray_t)
    }

    /// Look up a material by handle.
    ///
    /// Handles stored in the scene's primitives are always valid.
    #[inline]
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.index()]
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn primitive_count(&self) -> usize {
        self.bvh.primitive_count()
    }

    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}
