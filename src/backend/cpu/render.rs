//! Ray-traced rendering of a CPU scene.
//!
//! One primary ray per pixel. Surfaces get Lambert shading from every light,
//! weighted by the fraction of that light's shadow rays that reach it, on top
//! of a constant ambient term. Rows are traced in parallel.

use std::path::Path;

use image::{ImageFormat, RgbImage};
use rayon::prelude::*;

use super::{CpuScene, Light, Object};
use crate::config::RenderSettings;
use crate::geom::{Ray, Triangle};
use crate::util::{Error, Result, Vec3};

/// Light every surface receives regardless of shadows.
pub const AMBIENT: f32 = 0.1;

/// Distance below which primary hits are ignored.
const PRIMARY_EPSILON: f32 = 1e-4;

/// Render `scene` through its first camera.
#[tracing::instrument(skip_all, fields(width = settings.width, height = settings.height))]
pub fn render(scene: &CpuScene, settings: &RenderSettings) -> Result<RgbImage> {
    settings.validate_image()?;
    let camera = scene.camera().ok_or(Error::NoCamera)?;

    let (width, height) = (settings.width, settings.height);
    let aspect = camera.aspect_ratio() * settings.adjust_aspect;
    let use_bounds = settings.use_bounding_boxes();

    let start = std::time::Instant::now();
    let mut image = RgbImage::new(width, height);
    let row_len = width as usize * 3;

    image.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        for (x, pixel) in row.chunks_exact_mut(3).enumerate() {
            let ray = camera.primary_ray(x as u32, y as u32, width, height, aspect);
            let rgb = trace(scene, &ray, use_bounds);
            pixel.copy_from_slice(&to_rgb8(rgb));
        }
    });

    tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "rendered");
    Ok(image)
}

/// Write a rendered image as PNG.
pub fn save_png(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    image.save_with_format(path.as_ref(), ImageFormat::Png)?;
    tracing::info!(path = %path.as_ref().display(), "image written");
    Ok(())
}

/// Color seen along a primary ray. Black when nothing is hit.
fn trace(scene: &CpuScene, ray: &Ray, use_bounds: bool) -> Vec3 {
    let mut closest: Option<(f32, &Triangle, &Object)> = None;
    for object in &scene.objects {
        if let Some((hit, triangle)) = object.intersect(ray, PRIMARY_EPSILON, use_bounds) {
            if closest.map_or(true, |(t, _, _)| hit.t < t) {
                closest = Some((hit.t, triangle, object));
            }
        }
    }
    let Some((t, triangle, object)) = closest else {
        return Vec3::ZERO;
    };

    // Two-sided: face the normal toward the viewer.
    let mut normal = triangle.normal().normalize_or_zero();
    if normal.dot(ray.direction) > 0.0 {
        normal = -normal;
    }

    let direct: f32 = scene
        .lights
        .iter()
        .map(|light| irradiance(scene, light, ray, t, normal, use_bounds))
        .sum();

    object.color.to_vec3() * (AMBIENT + direct).min(1.0)
}

/// Lambert term of one light averaged over its unblocked shadow rays.
fn irradiance(scene: &CpuScene, light: &Light, primary: &Ray, t: f32, normal: Vec3, use_bounds: bool) -> f32 {
    let bias = light.shadow_bias();
    let rays = light.spawn_secondary_rays(primary, t);
    if rays.is_empty() {
        return 0.0;
    }

    let lit: f32 = rays
        .iter()
        .filter_map(|shadow| {
            let cos = normal.dot(shadow.direction);
            if cos <= 0.0 {
                return None;
            }
            // Ignore occluders within the bias of either end.
            let clipped = Ray {
                max_distance: shadow.max_distance - bias,
                ..*shadow
            };
            let blocked = scene
                .objects
                .iter()
                .any(|object| object.occludes(&clipped, bias, use_bounds));
            (!blocked).then_some(cos)
        })
        .sum();

    lit / rays.len() as f32
}

fn to_rgb8(color: Vec3) -> [u8; 3] {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::cpu::Camera;
    use crate::scene::{CameraParams, Color, LightParams, ObjectParts, SceneCamera, SceneLight, SceneObject};
    use crate::util::BoundingBox;
    use std::path::PathBuf;

    fn quad(z: f32, half: f32) -> Object {
        let a = Vec3::new(-half, -half, z);
        let b = Vec3::new(half, -half, z);
        let c = Vec3::new(half, half, z);
        let d = Vec3::new(-half, half, z);
        Object::from_parts(ObjectParts {
            triangles: vec![Triangle::new(a, b, c), Triangle::new(a, c, d)],
            bounding_box: BoundingBox::from_points([a, b, c, d]),
            color: Color::new(255, 255, 255),
        })
    }

    fn scene(light_at: Vec3) -> CpuScene {
        let mut scene = CpuScene::new();
        scene.cameras.push(Camera::from_params(CameraParams {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
            up: Vec3::Y,
            horizontal_fov: 60f32.to_radians(),
            aspect_ratio: 1.0,
        }));
        scene.lights.push(Light::from_params(LightParams::at(light_at)));
        scene.objects.push(quad(0.0, 10.0));
        scene
    }

    fn settings(size: u32) -> RenderSettings {
        RenderSettings {
            input: Some(PathBuf::from("unused.json")),
            width: size,
            height: size,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_camera() {
        let err = render(&CpuScene::new(), &settings(4)).unwrap_err();
        assert!(matches!(err, Error::NoCamera));
    }

    #[test]
    fn test_lit_quad() {
        let image = render(&scene(Vec3::new(0.0, 0.0, 3.0)), &settings(8)).unwrap();
        assert_eq!(image.dimensions(), (8, 8));
        let center = image.get_pixel(4, 4);
        // Light straight above: full Lambert plus ambient saturates.
        assert_eq!(center.0, [255, 255, 255]);
    }

    #[test]
    fn test_shadowed_quad() {
        let mut scene = scene(Vec3::new(0.0, 0.0, 3.0));
        // Large blocker between the floor and the light, behind the camera's view.
        scene.objects.push(quad(2.0, 50.0));
        scene.cameras[0] = Camera::from_params(CameraParams {
            origin: Vec3::new(0.0, 0.0, 1.0),
            direction: Vec3::NEG_Z,
            up: Vec3::Y,
            horizontal_fov: 60f32.to_radians(),
            aspect_ratio: 1.0,
        });
        let image = render(&scene, &settings(4)).unwrap();
        let ambient = (AMBIENT * 255.0).round() as u8;
        assert_eq!(image.get_pixel(2, 2).0, [ambient; 3]);
    }

    #[test]
    fn test_background() {
        let mut scene = scene(Vec3::new(0.0, 0.0, 3.0));
        scene.objects.clear();
        let image = render(&scene, &settings(4)).unwrap();
        assert!(image.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_bounding_boxes_do_not_change_image() {
        let scene = scene(Vec3::new(2.0, 1.0, 3.0));
        let with = render(&scene, &settings(16)).unwrap();
        let mut s = settings(16);
        s.disable_bounding_boxes = true;
        let without = render(&scene, &s).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let image = render(&scene(Vec3::new(0.0, 0.0, 3.0)), &settings(4)).unwrap();
        save_png(&image, &path).unwrap();
        assert!(path.exists());
    }
}
