//! Multi-core CPU backend.
//!
//! Entities keep plain `glam` data with a few values precomputed for
//! tracing. [`render`] draws a loaded scene into an RGB image.

mod render;

pub use render::{render, save_png, AMBIENT};

use crate::geom::{Ray, Triangle, TriangleHit};
use crate::light::{self, SecondaryRays};
use crate::scene::{
    CameraParams, Color, LightParams, MakeSceneTraits, ObjectParts, Scene, SceneCamera,
    SceneFunctions, SceneLight, SceneObject, SceneTypes,
};
use crate::util::{BoundingBox, Vec3};

/// Entity types of the CPU backend.
pub struct CpuSceneTypes;

impl SceneTypes for CpuSceneTypes {
    const NAME: &'static str = "cpu";

    type Camera = Camera;
    type Light = Light;
    type Object = Object;
}

pub type SceneTraits = MakeSceneTraits<CpuSceneTypes, SceneFunctions<CpuSceneTypes>>;

pub type CpuScene = Scene<CpuSceneTypes>;

// ============================================================================
// Camera
// ============================================================================

/// Pinhole camera with its image plane basis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    params: CameraParams,
    right: Vec3,
    /// Up vector made orthogonal to the view direction.
    up: Vec3,
    /// Half-width of the image plane at unit distance.
    tan_half_fov: f32,
}

impl Camera {
    /// Ray through the center of pixel `(x, y)`, rows from the top.
    ///
    /// `aspect_ratio` overrides the authored one so callers can apply an
    /// output-specific correction.
    pub fn primary_ray(&self, x: u32, y: u32, width: u32, height: u32, aspect_ratio: f32) -> Ray {
        let sx = (2.0 * (x as f32 + 0.5) / width as f32 - 1.0) * self.tan_half_fov;
        let sy = (1.0 - 2.0 * (y as f32 + 0.5) / height as f32) * self.tan_half_fov / aspect_ratio;
        Ray::new(
            self.params.origin,
            self.params.direction + self.right * sx + self.up * sy,
        )
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.params.aspect_ratio
    }
}

impl SceneCamera for Camera {
    fn from_params(params: CameraParams) -> Self {
        let right = params.direction.cross(params.up).normalize_or_zero();
        let up = right.cross(params.direction);
        Self {
            params,
            right,
            up,
            tan_half_fov: (params.horizontal_fov * 0.5).tan(),
        }
    }

    fn params(&self) -> CameraParams {
        self.params
    }
}

// ============================================================================
// Light
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    params: LightParams,
}

impl Light {
    #[inline]
    pub fn shadow_bias(&self) -> f32 {
        self.params.shadow_bias
    }

    /// Shadow rays toward this light from the point `distance` along `primary`.
    pub fn spawn_secondary_rays(&self, primary: &Ray, distance: f32) -> SecondaryRays {
        light::spawn_secondary_rays(&self.params, primary, distance)
    }
}

impl SceneLight for Light {
    fn from_params(params: LightParams) -> Self {
        Self { params }
    }

    fn params(&self) -> LightParams {
        self.params
    }
}

// ============================================================================
// Object
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub triangles: Vec<Triangle>,
    pub bounding_box: BoundingBox,
    pub color: Color,
}

impl Object {
    /// Closest triangle hit in `(t_min, ray.max_distance)`.
    ///
    /// With `use_bounds` the object box is tested first and a miss skips
    /// every triangle.
    pub fn intersect(&self, ray: &Ray, t_min: f32, use_bounds: bool) -> Option<(TriangleHit, &Triangle)> {
        if use_bounds && ray.intersect_box(&self.bounding_box).is_none() {
            return None;
        }

        let mut closest: Option<(TriangleHit, &Triangle)> = None;
        for triangle in &self.triangles {
            if let Some(hit) = triangle.intersect(ray, t_min) {
                if closest.map_or(true, |(best, _)| hit.t < best.t) {
                    closest = Some((hit, triangle));
                }
            }
        }
        closest
    }

    /// True when any triangle blocks `ray` in `(t_min, ray.max_distance)`.
    pub fn occludes(&self, ray: &Ray, t_min: f32, use_bounds: bool) -> bool {
        if use_bounds && ray.intersect_box(&self.bounding_box).is_none() {
            return false;
        }
        self.triangles.iter().any(|t| t.intersect(ray, t_min).is_some())
    }
}

impl SceneObject for Object {
    fn from_parts(parts: ObjectParts) -> Self {
        Self {
            triangles: parts.triangles,
            bounding_box: parts.bounding_box,
            color: parts.color,
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}
