//! Simple path tracer example.
//!
//! Renders a small hand-built scene and saves it as `simple_render.png`.

use raybow_renderer::{render, Background, Camera, Color, Material, RenderConfig, Scene, Vec3};

fn build_scene() -> Scene {
    let mut builder = Scene::builder();

    let ground = builder.add_material(Material::lambertian(Color::new(0.5, 0.5, 0.5)));
    let glass = builder.add_material(Material::dielectric(1.5).expect("glass"));
    let brown = builder.add_material(Material::lambertian(Color::new(0.4, 0.2, 0.1)));
    let metal = builder.add_material(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0));
    let lamp = builder.add_material(Material::diffuse_light(Color::splat(6.0)));

    builder
        .add_sphere(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)
        .expect("ground");
    builder
        .add_sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, glass)
        .expect("glass sphere");
    builder
        .add_sphere(Vec3::new(-4.0, 1.0, 0.0), 1.0, brown)
        .expect("diffuse sphere");
    builder
        .add_sphere(Vec3::new(4.0, 1.0, 0.0), 1.0, metal)
        .expect("metal sphere");
    builder
        .add_triangle(
            [
                Vec3::new(-2.0, 4.0, -2.0),
                Vec3::new(2.0, 4.0, -2.0),
                Vec3::new(0.0, 4.0, 2.0),
            ],
            lamp,
        )
        .expect("lamp");

    builder.build()
}

fn main() {
    println!("raybow - simple render");
    println!("======================");

    let start = std::time::Instant::now();
    let scene = build_scene();
    println!("Scene built in {:?}", start.elapsed());

    let config = RenderConfig {
        width: 600,
        height: 338,
        samples_per_pixel: 50,
        max_depth: 10,
        background: Background::SKY,
        ..RenderConfig::default()
    };

    let camera = Camera::builder()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, Some(10.0))
        .with_aspect_ratio(config.aspect_ratio())
        .build()
        .expect("valid camera");

    println!(
        "Rendering {}x{} @ {} spp...",
        config.width, config.height, config.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let image = render(&scene, &camera, &config)
        .expect("render failed")
        .finalize();
    println!("Rendered in {:?}", start.elapsed());

    let filename = "simple_render.png";
    image::save_buffer(
        filename,
        image.as_bytes(),
        image.width(),
        image.height(),
        image::ColorType::Rgb8,
    )
    .expect("Failed to save image");
    println!("Saved to {}", filename);
}
