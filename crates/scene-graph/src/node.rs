//! Node and attribute interfaces.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::layer::Layer;

// ============================================================================
// Attributes
// ============================================================================

/// Kind of attribute attached to a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// Plain transform node.
    #[default]
    None,
    Camera,
    Light,
    Mesh,
}

/// Camera attribute as authored in the asset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraAttribute {
    /// Eye position.
    pub position: Vec3,
    /// Look-at target.
    pub interest_position: Vec3,
    pub up_vector: Vec3,
    /// Horizontal field of view in degrees.
    pub field_of_view_x: f32,
    /// Film width / film height.
    pub film_aspect_ratio: f32,
    /// Focal length in millimeters.
    pub focal_length: f32,
}

impl Default for CameraAttribute {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            interest_position: Vec3::NEG_Z,
            up_vector: Vec3::Y,
            field_of_view_x: 40.0,
            film_aspect_ratio: 1.5,
            focal_length: 35.0,
        }
    }
}

/// Geometric (pivot) transform applied to a node's attribute only, not to
/// its children.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometricPivot {
    pub translation: Vec3,
    /// Euler angles in degrees, applied X then Y then Z.
    pub rotation: Vec3,
    pub scaling: Vec3,
}

impl GeometricPivot {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scaling: Vec3::ONE,
    };

    /// Pivot as a `T * R * S` matrix.
    pub fn matrix(&self) -> Mat4 {
        trs_matrix(self.translation, self.rotation, self.scaling)
    }
}

impl Default for GeometricPivot {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Compose translation, XYZ Euler rotation (degrees) and scale.
pub(crate) fn trs_matrix(translation: Vec3, rotation_deg: Vec3, scaling: Vec3) -> Mat4 {
    let rotation = Quat::from_rotation_z(rotation_deg.z.to_radians())
        * Quat::from_rotation_y(rotation_deg.y.to_radians())
        * Quat::from_rotation_x(rotation_deg.x.to_radians());
    Mat4::from_scale_rotation_translation(scaling, rotation, translation)
}

// ============================================================================
// Traits
// ============================================================================

/// Read access to a polygon mesh attribute.
pub trait MeshData {
    /// Vertex positions in the mesh's local space.
    fn control_points(&self) -> &[Vec3];

    /// Number of polygons.
    fn polygon_count(&self) -> usize;

    /// Number of vertices of a polygon.
    fn polygon_size(&self, polygon: usize) -> Option<usize>;

    /// Start of a polygon in the flattened polygon-vertex array.
    fn polygon_vertex_index(&self, polygon: usize) -> Option<usize>;

    /// Control point index of one polygon vertex.
    fn polygon_vertex(&self, polygon: usize, vertex: usize) -> Option<usize>;

    fn normals(&self) -> Option<&Layer<Vec3>> {
        None
    }

    fn tangents(&self) -> Option<&Layer<Vec3>> {
        None
    }

    fn uvs(&self) -> Option<&Layer<glam::Vec2>> {
        None
    }

    fn vertex_colors(&self) -> Option<&Layer<glam::Vec4>> {
        None
    }
}

/// One node of an imported scene hierarchy.
///
/// Nodes are cheap handles; `parent` and `children` return new handles into
/// the same graph.
pub trait SceneNode: Sized {
    type Mesh: MeshData;

    fn name(&self) -> &str;

    /// Kind of attribute attached to this node.
    fn attribute_type(&self) -> AttributeType;

    fn parent(&self) -> Option<Self>;

    fn children(&self) -> Vec<Self>;

    /// Transform relative to the parent node.
    fn local_transform(&self) -> Mat4;

    /// Geometric pivot of the attribute. Identity when the node carries no
    /// attribute.
    fn geometric_pivot(&self) -> GeometricPivot;

    fn camera(&self) -> Option<&CameraAttribute>;

    fn mesh(&self) -> Option<&Self::Mesh>;
}
