//! In-memory scene graph.
//!
//! Nodes live in a flat arena and refer to each other by [`NodeId`]. The
//! first node is always the unnamed root.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::layer::Layer;
use crate::node::{trs_matrix, AttributeType, CameraAttribute, GeometricPivot, MeshData, SceneNode};

/// Index of a node inside its [`NodeGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node of every graph.
    pub const ROOT: Self = Self(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

// ============================================================================
// Mesh
// ============================================================================

/// Polygon mesh with optional attribute layers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub control_points: Vec<Vec3>,
    /// Flattened control point indices of all polygons.
    polygon_vertices: Vec<u32>,
    /// Start of each polygon in `polygon_vertices`, plus a final end marker.
    polygon_starts: Vec<u32>,
    pub normals: Option<Layer<Vec3>>,
    pub tangents: Option<Layer<Vec3>>,
    pub uvs: Option<Layer<Vec2>>,
    pub vertex_colors: Option<Layer<Vec4>>,
}

impl Mesh {
    /// Mesh from control points and per-polygon index lists.
    pub fn new<P: AsRef<[u32]>>(control_points: Vec<Vec3>, polygons: &[P]) -> Self {
        let mut polygon_vertices = Vec::new();
        let mut polygon_starts = Vec::with_capacity(polygons.len() + 1);
        for polygon in polygons {
            polygon_starts.push(polygon_vertices.len() as u32);
            polygon_vertices.extend_from_slice(polygon.as_ref());
        }
        polygon_starts.push(polygon_vertices.len() as u32);

        Self {
            control_points,
            polygon_vertices,
            polygon_starts,
            ..Default::default()
        }
    }

    pub fn with_normals(mut self, layer: Layer<Vec3>) -> Self {
        self.normals = Some(layer);
        self
    }

    pub fn with_tangents(mut self, layer: Layer<Vec3>) -> Self {
        self.tangents = Some(layer);
        self
    }

    pub fn with_uvs(mut self, layer: Layer<Vec2>) -> Self {
        self.uvs = Some(layer);
        self
    }

    pub fn with_vertex_colors(mut self, layer: Layer<Vec4>) -> Self {
        self.vertex_colors = Some(layer);
        self
    }
}

impl MeshData for Mesh {
    fn control_points(&self) -> &[Vec3] {
        &self.control_points
    }

    fn polygon_count(&self) -> usize {
        self.polygon_starts.len().saturating_sub(1)
    }

    fn polygon_size(&self, polygon: usize) -> Option<usize> {
        let start = *self.polygon_starts.get(polygon)?;
        let end = *self.polygon_starts.get(polygon + 1)?;
        Some((end - start) as usize)
    }

    fn polygon_vertex_index(&self, polygon: usize) -> Option<usize> {
        if polygon >= self.polygon_count() {
            return None;
        }
        self.polygon_starts.get(polygon).map(|&s| s as usize)
    }

    fn polygon_vertex(&self, polygon: usize, vertex: usize) -> Option<usize> {
        if vertex >= self.polygon_size(polygon)? {
            return None;
        }
        let start = self.polygon_vertex_index(polygon)?;
        self.polygon_vertices.get(start + vertex).map(|&i| i as usize)
    }

    fn normals(&self) -> Option<&Layer<Vec3>> {
        self.normals.as_ref()
    }

    fn tangents(&self) -> Option<&Layer<Vec3>> {
        self.tangents.as_ref()
    }

    fn uvs(&self) -> Option<&Layer<Vec2>> {
        self.uvs.as_ref()
    }

    fn vertex_colors(&self) -> Option<&Layer<Vec4>> {
        self.vertex_colors.as_ref()
    }
}

// ============================================================================
// Node
// ============================================================================

/// Attribute payload of a node.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Attribute {
    #[default]
    None,
    Camera(CameraAttribute),
    Light,
    Mesh(Mesh),
}

impl Attribute {
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            Attribute::None => AttributeType::None,
            Attribute::Camera(_) => AttributeType::Camera,
            Attribute::Light => AttributeType::Light,
            Attribute::Mesh(_) => AttributeType::Mesh,
        }
    }
}

/// Node data stored in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub name: String,
    pub translation: Vec3,
    /// Euler angles in degrees, applied X then Y then Z.
    pub rotation: Vec3,
    pub scaling: Vec3,
    pub pivot: GeometricPivot,
    pub attribute: Attribute,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Transform node without attribute at the origin.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scaling: Vec3::ONE,
            pivot: GeometricPivot::IDENTITY,
            attribute: Attribute::None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scaling(mut self, scaling: Vec3) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn with_pivot(mut self, pivot: GeometricPivot) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attribute = attribute;
        self
    }

    /// Local `T * R * S` transform.
    pub fn local_transform(&self) -> Mat4 {
        trs_matrix(self.translation, self.rotation, self.scaling)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

// ============================================================================
// Graph
// ============================================================================

/// Arena-backed node hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeGraph {
    nodes: Vec<Node>,
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeGraph {
    /// Graph holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("")],
        }
    }

    /// Attach `node` below `parent` and return its id.
    ///
    /// Panics if `parent` does not belong to this graph.
    pub fn add(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "parent {parent:?} is not in this graph");
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph holds only the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            graph: self,
            id: NodeId::ROOT,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { graph: self, id })
    }

    /// First node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeRef<'_>> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeRef {
                graph: self,
                id: NodeId(i),
            })
    }
}

/// Handle to one node of a [`NodeGraph`].
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a> {
    graph: &'a NodeGraph,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn data(&self) -> &'a Node {
        &self.graph.nodes[self.id.0]
    }
}

impl<'a> SceneNode for NodeRef<'a> {
    type Mesh = Mesh;

    fn name(&self) -> &str {
        &self.data().name
    }

    fn attribute_type(&self) -> AttributeType {
        self.data().attribute.attribute_type()
    }

    fn parent(&self) -> Option<Self> {
        self.data().parent.map(|id| NodeRef {
            graph: self.graph,
            id,
        })
    }

    fn children(&self) -> Vec<Self> {
        self.data()
            .children
            .iter()
            .map(|&id| NodeRef {
                graph: self.graph,
                id,
            })
            .collect()
    }

    fn local_transform(&self) -> Mat4 {
        self.data().local_transform()
    }

    fn geometric_pivot(&self) -> GeometricPivot {
        let node = self.data();
        match node.attribute {
            Attribute::None => GeometricPivot::IDENTITY,
            _ => node.pivot,
        }
    }

    fn camera(&self) -> Option<&CameraAttribute> {
        match &self.data().attribute {
            Attribute::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    fn mesh(&self) -> Option<&Mesh> {
        match &self.data().attribute {
            Attribute::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            &[vec![0, 1, 2], vec![0, 2, 3, 1]],
        )
    }

    #[test]
    fn test_mesh_polygons() {
        let mesh = quad();
        assert_eq!(mesh.polygon_count(), 2);
        assert_eq!(mesh.polygon_size(0), Some(3));
        assert_eq!(mesh.polygon_size(1), Some(4));
        assert_eq!(mesh.polygon_size(2), None);
        assert_eq!(mesh.polygon_vertex_index(1), Some(3));
        assert_eq!(mesh.polygon_vertex(1, 2), Some(3));
        assert_eq!(mesh.polygon_vertex(0, 3), None);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::new::<[u32; 3]>(Vec::new(), &[]);
        assert_eq!(mesh.polygon_count(), 0);
        assert_eq!(mesh.polygon_vertex_index(0), None);
    }

    #[test]
    fn test_hierarchy() {
        let mut graph = NodeGraph::new();
        let rig = graph.add(NodeId::ROOT, Node::new("rig"));
        let cube = graph.add(
            rig,
            Node::new("cube").with_attribute(Attribute::Mesh(quad())),
        );

        assert_eq!(graph.len(), 3);
        assert!(!graph.is_empty());

        let node = graph.get(cube).unwrap();
        assert_eq!(node.name(), "cube");
        assert_eq!(node.attribute_type(), AttributeType::Mesh);
        assert_eq!(node.parent().unwrap().name(), "rig");
        assert_eq!(node.parent().unwrap().parent().unwrap().id(), NodeId::ROOT);
        assert!(graph.root().parent().is_none());
        assert_eq!(graph.root().children().len(), 1);
        assert_eq!(graph.find("cube").unwrap().id(), cube);
        assert!(graph.find("sphere").is_none());
    }

    #[test]
    fn test_pivot_ignored_without_attribute() {
        let pivot = GeometricPivot {
            translation: Vec3::ONE,
            ..GeometricPivot::IDENTITY
        };
        let mut graph = NodeGraph::new();
        let group = graph.add(NodeId::ROOT, Node::new("group").with_pivot(pivot));
        let light = graph.add(
            NodeId::ROOT,
            Node::new("light").with_pivot(pivot).with_attribute(Attribute::Light),
        );

        assert_eq!(graph.get(group).unwrap().geometric_pivot(), GeometricPivot::IDENTITY);
        assert_eq!(graph.get(light).unwrap().geometric_pivot(), pivot);
    }

    #[test]
    fn test_local_transform() {
        let node = Node::new("n")
            .with_translation(Vec3::new(1.0, 2.0, 3.0))
            .with_scaling(Vec3::splat(2.0));
        let p = node.local_transform().transform_point3(Vec3::ONE);
        assert_eq!(p, Vec3::new(3.0, 4.0, 5.0));
    }
}
