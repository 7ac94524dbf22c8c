//! Scene graph to entity conversion shared by every backend.
//!
//! [`SceneFunctions`] is written once against [`SceneTypes`] and produces the
//! camera, light and object types of whichever backend it is instantiated
//! with. The free functions below it resolve transforms and per-vertex layer
//! values and do not depend on a backend at all.

use std::marker::PhantomData;

use rand::Rng;
use scene_graph::{
    AttributeType, LayerElement, MappingMode, MeshData, ReferenceMode, SceneNode,
};
use smallvec::SmallVec;

use crate::geom::Triangle;
use crate::scene::{
    CameraParams, Color, LightParams, ObjectBuilder, SceneBuilder, SceneCamera, SceneLight,
    SceneObject, SceneTypes,
};
use crate::util::{Error, Mat4, Result, Vec2, Vec3, Vec4};

/// Builder for the entities of backend `T`.
pub struct SceneFunctions<T>(PhantomData<T>);

impl<T: SceneTypes> SceneBuilder<T> for SceneFunctions<T> {
    #[tracing::instrument(skip_all, fields(node = node.name(), backend = T::NAME))]
    fn create_camera<N: SceneNode>(node: &N) -> Result<T::Camera> {
        expect_attribute(node, AttributeType::Camera)?;
        let attribute = node.camera().ok_or_else(|| mismatch(node, AttributeType::Camera))?;

        let direction = (attribute.interest_position - attribute.position).normalize_or_zero();
        if direction == Vec3::ZERO {
            return Err(Error::DegenerateCamera(node.name().to_string()));
        }

        let fov = attribute.field_of_view_x;
        if !(fov.is_finite() && fov > 0.0 && fov < 180.0) {
            return Err(invalid_camera(node, "field of view", fov));
        }
        let aspect_ratio = attribute.film_aspect_ratio;
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Err(invalid_camera(node, "aspect ratio", aspect_ratio));
        }

        let mut up = attribute.up_vector.normalize_or_zero();
        if direction.cross(up).length_squared() < 1e-12 {
            let (substitute, _) = direction.any_orthonormal_pair();
            tracing::warn!(up = ?attribute.up_vector, ?substitute, "up vector along the view, substituting");
            up = substitute;
        }

        let params = CameraParams {
            origin: attribute.position,
            direction,
            up,
            horizontal_fov: fov.to_radians(),
            aspect_ratio,
        };
        tracing::debug!(origin = ?params.origin, direction = ?params.direction, "camera");
        Ok(T::Camera::from_params(params))
    }

    #[tracing::instrument(skip_all, fields(node = node.name(), backend = T::NAME))]
    fn create_light<N: SceneNode>(node: &N) -> Result<T::Light> {
        expect_attribute(node, AttributeType::Light)?;

        let position = world_transform(node).w_axis.truncate();
        tracing::debug!(?position, "light");
        Ok(T::Light::from_params(LightParams::at(position)))
    }

    #[tracing::instrument(skip_all, fields(node = node.name(), backend = T::NAME))]
    fn create_object<N: SceneNode, R: Rng + ?Sized>(node: &N, rng: &mut R) -> Result<T::Object> {
        expect_attribute(node, AttributeType::Mesh)?;
        let mesh = node.mesh().ok_or_else(|| mismatch(node, AttributeType::Mesh))?;

        let transform = mesh_transform(node);
        let control_points = mesh.control_points();
        let polygon_count = mesh.polygon_count();
        let mut builder = ObjectBuilder::with_capacity(polygon_count);

        for polygon in 0..polygon_count {
            let size = mesh
                .polygon_size(polygon)
                .ok_or_else(|| Error::out_of_bounds("polygon", polygon, polygon_count))?;
            if size < 3 {
                tracing::warn!(polygon, size, "skipping polygon with fewer than 3 vertices");
                continue;
            }

            let mut points: SmallVec<[Vec3; 4]> = SmallVec::with_capacity(size);
            for vertex in 0..size {
                let index = mesh
                    .polygon_vertex(polygon, vertex)
                    .ok_or_else(|| Error::out_of_bounds("polygon vertex", vertex, size))?;
                let point = control_points
                    .get(index)
                    .ok_or_else(|| Error::out_of_bounds("control point", index, control_points.len()))?;
                points.push(transform.transform_point3(*point));
            }

            // Fan around the first vertex
            for i in 1..size - 1 {
                builder.push(Triangle::new(points[0], points[i], points[i + 1]));
            }
        }

        let color = Color::random(rng);
        tracing::debug!(triangles = builder.len(), bounds = ?builder.bounding_box(), ?color, "object");
        Ok(T::Object::from_parts(builder.finish(color)))
    }
}

fn mismatch<N: SceneNode>(node: &N, expected: AttributeType) -> Error {
    Error::AttributeMismatch {
        node: node.name().to_string(),
        expected,
        actual: node.attribute_type(),
    }
}

fn invalid_camera<N: SceneNode>(node: &N, field: &'static str, value: f32) -> Error {
    Error::InvalidCamera {
        node: node.name().to_string(),
        field,
        value,
    }
}

fn expect_attribute<N: SceneNode>(node: &N, expected: AttributeType) -> Result<()> {
    if node.attribute_type() == expected {
        Ok(())
    } else {
        Err(mismatch(node, expected))
    }
}

// ============================================================================
// Transforms
// ============================================================================

/// Product of the local transforms from the root down to `node`.
pub fn world_transform<N: SceneNode>(node: &N) -> Mat4 {
    let mut transform = node.local_transform();
    let mut current = node.parent();
    while let Some(parent) = current {
        transform = parent.local_transform() * transform;
        current = parent.parent();
    }
    transform
}

/// World transform of a node's geometry: ancestors, then the node itself,
/// then its geometric pivot.
pub fn mesh_transform<N: SceneNode>(node: &N) -> Mat4 {
    world_transform(node) * node.geometric_pivot().matrix()
}

// ============================================================================
// Layers
// ============================================================================

/// Value of `layer` for one vertex of one polygon.
///
/// The layer's mapping mode selects which index addresses the element, the
/// reference mode decides whether that index goes through the index table.
/// `polygon` and `vertex` must exist in the mesh whatever the mapping.
pub fn get_element<M, L>(mesh: &M, layer: &L, polygon: usize, vertex: usize) -> Result<L::Value>
where
    M: MeshData,
    L: LayerElement,
{
    let size = mesh
        .polygon_size(polygon)
        .ok_or_else(|| Error::out_of_bounds("polygon", polygon, mesh.polygon_count()))?;
    if vertex >= size {
        return Err(Error::out_of_bounds("polygon vertex", vertex, size));
    }

    let index = match layer.mapping_mode() {
        MappingMode::AllSame => 0,
        MappingMode::ByControlPoint => mesh
            .polygon_vertex(polygon, vertex)
            .ok_or_else(|| Error::out_of_bounds("polygon vertex", vertex, size))?,
        MappingMode::ByPolygon => polygon,
        MappingMode::ByPolygonVertex => {
            let start = mesh
                .polygon_vertex_index(polygon)
                .ok_or_else(|| Error::out_of_bounds("polygon", polygon, mesh.polygon_count()))?;
            start + vertex
        }
        mode @ (MappingMode::ByEdge | MappingMode::None) => {
            return Err(Error::UnsupportedMappingMode(mode));
        }
    };

    let index = match layer.reference_mode() {
        ReferenceMode::Direct => index,
        ReferenceMode::IndexToDirect => layer
            .index(index)
            .ok_or_else(|| Error::out_of_bounds("layer index", index, layer.index_len()))?,
        mode @ ReferenceMode::Index => return Err(Error::UnsupportedReferenceMode(mode)),
    };

    layer
        .direct(index)
        .ok_or_else(|| Error::out_of_bounds("layer element", index, layer.direct_len()))
}

/// Normal of a polygon vertex, `None` when the mesh has no normal layer.
pub fn vertex_normal<M: MeshData>(mesh: &M, polygon: usize, vertex: usize) -> Result<Option<Vec3>> {
    mesh.normals().map(|layer| get_element(mesh, layer, polygon, vertex)).transpose()
}

/// Tangent of a polygon vertex, `None` when the mesh has no tangent layer.
pub fn vertex_tangent<M: MeshData>(mesh: &M, polygon: usize, vertex: usize) -> Result<Option<Vec3>> {
    mesh.tangents().map(|layer| get_element(mesh, layer, polygon, vertex)).transpose()
}

/// Texture coordinate of a polygon vertex.
pub fn vertex_uv<M: MeshData>(mesh: &M, polygon: usize, vertex: usize) -> Result<Option<Vec2>> {
    mesh.uvs().map(|layer| get_element(mesh, layer, polygon, vertex)).transpose()
}

/// RGBA color of a polygon vertex.
pub fn vertex_color<M: MeshData>(mesh: &M, polygon: usize, vertex: usize) -> Result<Option<Vec4>> {
    mesh.vertex_colors().map(|layer| get_element(mesh, layer, polygon, vertex)).transpose()
}
