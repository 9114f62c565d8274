//! Example: Load and inspect a scene file.
//!
//! Run with: cargo run --example load_scene -- scenes/spheres.ron

use std::env;

use raybow_core::{load_scene, BackgroundDesc, MaterialDesc, ObjectDesc};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_scene <path-to-ron-file>");
        println!("\nExamples:");
        println!("  cargo run --example load_scene -- scenes/spheres.ron");
        println!("  cargo run --example load_scene -- scenes/lamp.ron");
        return;
    }

    let path = &args[1];
    println!("Loading scene file: {}", path);

    match load_scene(path) {
        Ok(scene) => {
            println!("\n=== Scene ===");
            println!("Materials: {}", scene.material_count());
            println!("Objects: {}", scene.object_count());

            let background = match scene.background {
                BackgroundDesc::Sky => "sky gradient".to_string(),
                BackgroundDesc::Solid(rgb) => format!("solid {:?}", rgb.color()),
                BackgroundDesc::Gradient { bottom, top } => {
                    format!("gradient {:?} -> {:?}", bottom.color(), top.color())
                }
            };
            println!("Background: {}", background);

            let camera = &scene.camera;
            println!(
                "Camera: ({:.2}, {:.2}, {:.2}) looking at ({:.2}, {:.2}, {:.2}), vfov {:.1}, aperture {:.2}, focus {:.2}",
                camera.position.x,
                camera.position.y,
                camera.position.z,
                camera.lookat.x,
                camera.lookat.y,
                camera.lookat.z,
                camera.vfov,
                camera.aperture,
                camera.resolved_focus_distance()
            );

            println!("\n--- Materials ---");
            for (name, material) in &scene.materials {
                let kind = match material {
                    MaterialDesc::Lambertian { .. } => "lambertian",
                    MaterialDesc::Metal { .. } => "metal",
                    MaterialDesc::Dielectric { .. } => "dielectric",
                    MaterialDesc::DiffuseLight { .. } => "diffuse light",
                };
                println!("  {} ({})", name, kind);
            }

            println!("\n--- Objects ---");
            for (i, object) in scene.objects.iter().enumerate() {
                match object {
                    ObjectDesc::Sphere {
                        center,
                        radius,
                        material,
                    } => println!(
                        "  [{}] sphere at ({:.2}, {:.2}, {:.2}) r={:.2} [{}]",
                        i, center.x, center.y, center.z, radius, material
                    ),
                    ObjectDesc::Triangle { material, .. } => {
                        println!("  [{}] triangle [{}]", i, material)
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("Error loading scene file: {}", e);
        }
    }
}
