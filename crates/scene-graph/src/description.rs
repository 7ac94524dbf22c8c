//! JSON scene description.
//!
//! A scene file lists nodes in parent-before-child order:
//!
//! ```json
//! {
//!   "nodes": [
//!     { "name": "rig", "translation": [0, 1, 0] },
//!     { "name": "cam", "parent": "rig",
//!       "attribute": { "type": "camera", "position": [0, 0, 5], "target": [0, 0, 0] } },
//!     { "name": "key", "translation": [2, 4, 2], "attribute": { "type": "light" } },
//!     { "name": "tri", "attribute": { "type": "mesh",
//!       "points": [[0, 0, 0], [1, 0, 0], [0, 1, 0]], "polygons": [[0, 1, 2]] } }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layer::{Layer, MappingMode, ReferenceMode};
use crate::memory::{Attribute, Mesh, Node, NodeGraph, NodeId};
use crate::node::{CameraAttribute, GeometricPivot};

/// Whole scene file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub nodes: Vec<NodeDescription>,
}

/// One node entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    /// Name of an earlier node; the root when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default = "zero3")]
    pub translation: [f32; 3],
    /// Euler angles in degrees.
    #[serde(default = "zero3")]
    pub rotation: [f32; 3],
    #[serde(default = "one3")]
    pub scaling: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<PivotDescription>,
    #[serde(default)]
    pub attribute: AttributeDescription,
}

impl NodeDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            translation: zero3(),
            rotation: zero3(),
            scaling: one3(),
            pivot: None,
            attribute: AttributeDescription::None,
        }
    }
}

/// Geometric pivot entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PivotDescription {
    #[serde(default = "zero3")]
    pub translation: [f32; 3],
    #[serde(default = "zero3")]
    pub rotation: [f32; 3],
    #[serde(default = "one3")]
    pub scaling: [f32; 3],
}

/// Node attribute entry, tagged by `type`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeDescription {
    #[default]
    None,
    Camera(CameraDescription),
    Light,
    Mesh(MeshDescription),
}

/// Camera attribute entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    pub position: [f32; 3],
    pub target: [f32; 3],
    #[serde(default = "up3")]
    pub up: [f32; 3],
    /// Horizontal field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_aspect")]
    pub aspect: f32,
    #[serde(default = "default_focal_length")]
    pub focal_length: f32,
}

/// Mesh attribute entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDescription {
    pub points: Vec<[f32; 3]>,
    pub polygons: Vec<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normals: Option<LayerDescription<[f32; 3]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tangents: Option<LayerDescription<[f32; 3]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uvs: Option<LayerDescription<[f32; 2]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<LayerDescription<[f32; 4]>>,
}

/// Attribute layer entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerDescription<T> {
    pub mapping: MappingMode,
    #[serde(default)]
    pub reference: ReferenceMode,
    pub values: Vec<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<u32>,
}

fn zero3() -> [f32; 3] {
    [0.0; 3]
}

fn one3() -> [f32; 3] {
    [1.0; 3]
}

fn up3() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_fov() -> f32 {
    CameraAttribute::default().field_of_view_x
}

fn default_aspect() -> f32 {
    CameraAttribute::default().film_aspect_ratio
}

fn default_focal_length() -> f32 {
    CameraAttribute::default().focal_length
}

impl<T: Copy> LayerDescription<T> {
    fn to_layer<U>(&self, convert: impl Fn(T) -> U) -> Layer<U> {
        Layer {
            mapping_mode: self.mapping,
            reference_mode: self.reference,
            direct: self.values.iter().map(|&v| convert(v)).collect(),
            indices: self.indices.clone(),
        }
    }
}

impl MeshDescription {
    fn to_mesh(&self) -> Mesh {
        let points = self.points.iter().map(|&p| Vec3::from_array(p)).collect();
        let mut mesh = Mesh::new(points, &self.polygons);
        mesh.normals = self.normals.as_ref().map(|l| l.to_layer(Vec3::from_array));
        mesh.tangents = self.tangents.as_ref().map(|l| l.to_layer(Vec3::from_array));
        mesh.uvs = self.uvs.as_ref().map(|l| l.to_layer(Vec2::from_array));
        mesh.vertex_colors = self.colors.as_ref().map(|l| l.to_layer(Vec4::from_array));
        mesh
    }
}

impl AttributeDescription {
    fn to_attribute(&self) -> Attribute {
        match self {
            AttributeDescription::None => Attribute::None,
            AttributeDescription::Light => Attribute::Light,
            AttributeDescription::Camera(c) => Attribute::Camera(CameraAttribute {
                position: Vec3::from_array(c.position),
                interest_position: Vec3::from_array(c.target),
                up_vector: Vec3::from_array(c.up),
                field_of_view_x: c.fov,
                film_aspect_ratio: c.aspect,
                focal_length: c.focal_length,
            }),
            AttributeDescription::Mesh(m) => Attribute::Mesh(m.to_mesh()),
        }
    }
}

impl SceneDescription {
    /// Parse a JSON scene description.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the node graph. Parents must appear before their children.
    pub fn to_graph(&self) -> Result<NodeGraph> {
        let mut graph = NodeGraph::new();
        let mut ids: HashMap<&str, NodeId> = HashMap::with_capacity(self.nodes.len());

        for desc in &self.nodes {
            if desc.name.is_empty() {
                return Err(Error::invalid("node without a name"));
            }
            if ids.contains_key(desc.name.as_str()) {
                return Err(Error::DuplicateNode(desc.name.clone()));
            }

            let parent = match &desc.parent {
                None => NodeId::ROOT,
                Some(name) => *ids.get(name.as_str()).ok_or_else(|| Error::UnknownParent {
                    node: desc.name.clone(),
                    parent: name.clone(),
                })?,
            };

            let pivot = desc.pivot.as_ref().map_or(GeometricPivot::IDENTITY, |p| GeometricPivot {
                translation: Vec3::from_array(p.translation),
                rotation: Vec3::from_array(p.rotation),
                scaling: Vec3::from_array(p.scaling),
            });

            let node = Node::new(desc.name.clone())
                .with_translation(Vec3::from_array(desc.translation))
                .with_rotation(Vec3::from_array(desc.rotation))
                .with_scaling(Vec3::from_array(desc.scaling))
                .with_pivot(pivot)
                .with_attribute(desc.attribute.to_attribute());

            let id = graph.add(parent, node);
            ids.insert(desc.name.as_str(), id);
        }

        Ok(graph)
    }
}

impl NodeGraph {
    /// Load a JSON scene description from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        SceneDescription::from_json(&json)?.to_graph()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerElement;
    use crate::node::{AttributeType, MeshData, SceneNode};

    const SCENE: &str = r#"{
        "nodes": [
            { "name": "rig", "translation": [0, 1, 0] },
            { "name": "cam", "parent": "rig",
              "attribute": { "type": "camera", "position": [0, 0, 5], "target": [0, 0, 0], "fov": 60 } },
            { "name": "key", "translation": [2, 4, 2], "attribute": { "type": "light" } },
            { "name": "tri",
              "pivot": { "scaling": [2, 2, 2] },
              "attribute": { "type": "mesh",
                "points": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
                "polygons": [[0, 1, 2]],
                "normals": { "mapping": "all_same", "values": [[0, 0, 1]] },
                "uvs": { "mapping": "by_polygon_vertex", "reference": "index_to_direct",
                         "values": [[0, 0], [1, 0], [0, 1]], "indices": [2, 1, 0] } } }
        ]
    }"#;

    #[test]
    fn test_parse_scene() {
        let graph = SceneDescription::from_json(SCENE).unwrap().to_graph().unwrap();
        assert_eq!(graph.len(), 5);

        let cam = graph.find("cam").unwrap();
        assert_eq!(cam.attribute_type(), AttributeType::Camera);
        assert_eq!(cam.parent().unwrap().name(), "rig");
        let camera = cam.camera().unwrap();
        assert_eq!(camera.field_of_view_x, 60.0);
        assert_eq!(camera.up_vector, Vec3::Y);
        assert_eq!(camera.film_aspect_ratio, 1.5);

        let key = graph.find("key").unwrap();
        assert_eq!(key.attribute_type(), AttributeType::Light);
        assert_eq!(key.data().translation, Vec3::new(2.0, 4.0, 2.0));

        let tri = graph.find("tri").unwrap();
        assert_eq!(tri.geometric_pivot().scaling, Vec3::splat(2.0));
        let mesh = tri.mesh().unwrap();
        assert_eq!(mesh.polygon_count(), 1);
        assert_eq!(mesh.normals().unwrap().mapping_mode(), MappingMode::AllSame);
        let uvs = mesh.uvs().unwrap();
        assert_eq!(uvs.reference_mode(), ReferenceMode::IndexToDirect);
        assert_eq!(uvs.index(0), Some(2));
    }

    #[test]
    fn test_unknown_parent() {
        let json = r#"{ "nodes": [ { "name": "a", "parent": "b" } ] }"#;
        let err = SceneDescription::from_json(json).unwrap().to_graph().unwrap_err();
        assert!(matches!(err, Error::UnknownParent { .. }));
    }

    #[test]
    fn test_duplicate_node() {
        let json = r#"{ "nodes": [ { "name": "a" }, { "name": "a" } ] }"#;
        let err = SceneDescription::from_json(json).unwrap().to_graph().unwrap_err();
        assert!(matches!(err, Error::DuplicateNode(name) if name == "a"));
    }

    #[test]
    fn test_malformed_json() {
        let err = SceneDescription::from_json("{ \"nodes\": 3 }").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = NodeGraph::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, SCENE).unwrap();

        let graph = NodeGraph::load(&path).unwrap();
        assert!(graph.find("tri").is_some());
    }
}
