//! Flatten a GPU scene into storage buffers.

use bytemuck::{Pod, Zeroable};

use super::{GpuCamera, GpuLight, GpuScene, GpuTriangle};

/// Buffer element counts, uploaded as a uniform (16 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct GpuSceneHeader {
    pub camera_count: u32,
    pub light_count: u32,
    pub object_count: u32,
    pub triangle_count: u32,
}

/// Object entry pointing into the shared triangle buffer (48 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuObjectRecord {
    pub bounds_min: [f32; 3],
    pub first_triangle: u32,
    pub bounds_max: [f32; 3],
    pub triangle_count: u32,
    pub color: [f32; 4],
}

/// Complete scene data ready for GPU upload.
pub struct GpuSceneData {
    pub header: GpuSceneHeader,
    pub cameras: Vec<GpuCamera>,
    pub lights: Vec<GpuLight>,
    pub objects: Vec<GpuObjectRecord>,
    /// Triangles of all objects, in object order.
    pub triangles: Vec<GpuTriangle>,
}

/// Pack every entity of `scene` into flat arrays.
#[tracing::instrument(skip_all, fields(objects = scene.objects.len()))]
pub fn build_gpu_data(scene: &GpuScene) -> GpuSceneData {
    let total: usize = scene.objects.iter().map(|o| o.triangles.len()).sum();
    let mut triangles = Vec::with_capacity(total);
    let mut objects = Vec::with_capacity(scene.objects.len());

    for object in &scene.objects {
        objects.push(GpuObjectRecord {
            bounds_min: object.bounds.min,
            first_triangle: triangles.len() as u32,
            bounds_max: object.bounds.max,
            triangle_count: object.triangles.len() as u32,
            color: object.color,
        });
        triangles.extend_from_slice(&object.triangles);
    }

    let data = GpuSceneData {
        header: GpuSceneHeader {
            camera_count: scene.cameras.len() as u32,
            light_count: scene.lights.len() as u32,
            object_count: objects.len() as u32,
            triangle_count: triangles.len() as u32,
        },
        cameras: scene.cameras.clone(),
        lights: scene.lights.clone(),
        objects,
        triangles,
    };
    tracing::debug!(bytes = data.total_bytes(), "gpu buffers packed");
    data
}

/// Convert GpuSceneData to raw byte slices for buffer creation.
impl GpuSceneData {
    pub fn header_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.header)
    }

    pub fn cameras_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cameras)
    }

    pub fn lights_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lights)
    }

    pub fn objects_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.objects)
    }

    pub fn triangles_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Size of all buffers together.
    pub fn total_bytes(&self) -> usize {
        self.header_bytes().len()
            + self.cameras_bytes().len()
            + self.lights_bytes().len()
            + self.objects_bytes().len()
            + self.triangles_bytes().len()
    }
}
