//! GPU compute backend data.
//!
//! Entities are `#[repr(C)]` Pod records laid out for WGSL storage buffers
//! (every `vec3` padded to 16 bytes). [`build_gpu_data`] flattens a loaded
//! scene into upload-ready buffers; creating devices and dispatching kernels
//! is left to the host application.

mod gpu_data;

pub use gpu_data::{build_gpu_data, GpuObjectRecord, GpuSceneData, GpuSceneHeader};

use bytemuck::{Pod, Zeroable};

use crate::geom::{Ray, Triangle};
use crate::light;
use crate::scene::{
    CameraParams, Color, LightParams, MakeSceneTraits, ObjectParts, Scene, SceneCamera,
    SceneFunctions, SceneLight, SceneObject, SceneTypes,
};
use crate::util::{BoundingBox, Vec3};

/// Entity types of the GPU backend.
pub struct GpuSceneTypes;

impl SceneTypes for GpuSceneTypes {
    const NAME: &'static str = "gpu";

    type Camera = GpuCamera;
    type Light = GpuLight;
    type Object = GpuObject;
}

pub type SceneTraits = MakeSceneTraits<GpuSceneTypes, SceneFunctions<GpuSceneTypes>>;

pub type GpuScene = Scene<GpuSceneTypes>;

// ============================================================================
// Camera
// ============================================================================

/// Camera for GPU (48 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuCamera {
    pub origin: [f32; 3],
    /// Radians.
    pub horizontal_fov: f32,
    pub direction: [f32; 3],
    pub aspect_ratio: f32,
    pub up: [f32; 3],
    pub _pad: u32,
}

impl SceneCamera for GpuCamera {
    fn from_params(params: CameraParams) -> Self {
        Self {
            origin: params.origin.to_array(),
            horizontal_fov: params.horizontal_fov,
            direction: params.direction.to_array(),
            aspect_ratio: params.aspect_ratio,
            up: params.up.to_array(),
            _pad: 0,
        }
    }

    fn params(&self) -> CameraParams {
        CameraParams {
            origin: Vec3::from_array(self.origin),
            direction: Vec3::from_array(self.direction),
            up: Vec3::from_array(self.up),
            horizontal_fov: self.horizontal_fov,
            aspect_ratio: self.aspect_ratio,
        }
    }
}

// ============================================================================
// Light
// ============================================================================

/// Light for GPU (32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    pub position: [f32; 3],
    pub shadow_bias: f32,
    pub subdivs: u32,
    pub radius: f32,
    pub _pad: [u32; 2],
}

impl GpuLight {
    /// Shadow rays toward this light from the point `distance` along
    /// `primary`, in the same order as the CPU backend produces them.
    pub fn spawn_secondary_rays(&self, primary: &GpuRay, distance: f32) -> Vec<GpuRay> {
        light::spawn_secondary_rays(&self.params(), &primary.to_ray(), distance)
            .iter()
            .map(GpuRay::from_ray)
            .collect()
    }
}

impl SceneLight for GpuLight {
    fn from_params(params: LightParams) -> Self {
        Self {
            position: params.position.to_array(),
            shadow_bias: params.shadow_bias,
            subdivs: params.subdivs,
            radius: params.radius,
            _pad: [0; 2],
        }
    }

    fn params(&self) -> LightParams {
        LightParams {
            position: Vec3::from_array(self.position),
            shadow_bias: self.shadow_bias,
            subdivs: self.subdivs,
            radius: self.radius,
        }
    }
}

// ============================================================================
// Primitives
// ============================================================================

/// Ray for GPU (32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuRay {
    pub origin: [f32; 3],
    pub max_distance: f32,
    pub direction: [f32; 3],
    pub _pad: u32,
}

impl GpuRay {
    pub fn from_ray(ray: &Ray) -> Self {
        Self {
            origin: ray.origin.to_array(),
            max_distance: ray.max_distance,
            direction: ray.direction.to_array(),
            _pad: 0,
        }
    }

    /// Direction is taken as stored.
    pub fn to_ray(&self) -> Ray {
        Ray {
            origin: Vec3::from_array(self.origin),
            direction: Vec3::from_array(self.direction),
            max_distance: self.max_distance,
        }
    }
}

/// Triangle for GPU (48 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuTriangle {
    pub v0: [f32; 3],
    pub _pad0: u32,
    pub v1: [f32; 3],
    pub _pad1: u32,
    pub v2: [f32; 3],
    pub _pad2: u32,
}

impl From<&Triangle> for GpuTriangle {
    fn from(t: &Triangle) -> Self {
        Self {
            v0: t.a.to_array(),
            _pad0: 0,
            v1: t.b.to_array(),
            _pad1: 0,
            v2: t.c.to_array(),
            _pad2: 0,
        }
    }
}

/// Axis-aligned box for GPU (32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuBounds {
    pub min: [f32; 3],
    pub _pad0: u32,
    pub max: [f32; 3],
    pub _pad1: u32,
}

impl From<BoundingBox> for GpuBounds {
    fn from(b: BoundingBox) -> Self {
        Self {
            min: b.min.to_array(),
            _pad0: 0,
            max: b.max.to_array(),
            _pad1: 0,
        }
    }
}

impl From<GpuBounds> for BoundingBox {
    fn from(b: GpuBounds) -> Self {
        BoundingBox::new(Vec3::from_array(b.min), Vec3::from_array(b.max))
    }
}

// ============================================================================
// Object
// ============================================================================

/// Object with GPU-layout triangles. Flattened by [`build_gpu_data`].
#[derive(Debug, Clone, PartialEq)]
pub struct GpuObject {
    pub triangles: Vec<GpuTriangle>,
    pub bounds: GpuBounds,
    /// rgb in `0..=1`, a = 1.
    pub color: [f32; 4],
}

fn color_rgba(color: Color) -> [f32; 4] {
    let c = color.to_vec3();
    [c.x, c.y, c.z, 1.0]
}

impl SceneObject for GpuObject {
    fn from_parts(parts: ObjectParts) -> Self {
        Self {
            triangles: parts.triangles.iter().map(GpuTriangle::from).collect(),
            bounds: parts.bounding_box.into(),
            color: color_rgba(parts.color),
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        self.bounds.into()
    }

    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}
