//! # Scene graph
//!
//! Read-only view of an imported 3D scene: a node hierarchy with local
//! transforms, per-node attributes (camera, light, mesh) and layered per-vertex
//! mesh data.
//!
//! Renderers only ever talk to the traits in this crate:
//!
//! - [`SceneNode`] - one node of the hierarchy
//! - [`MeshData`] - control points, polygons and attribute layers of a mesh
//! - [`LayerElement`] - one per-vertex attribute layer with its encoding
//!
//! [`NodeGraph`] is the in-memory implementation, usually filled from a JSON
//! scene description with [`NodeGraph::load`].
//!
//! ## Example
//!
//! ```ignore
//! use scene_graph::{NodeGraph, SceneNode};
//!
//! let graph = NodeGraph::load("scene.json")?;
//! for node in graph.root().children() {
//!     println!("{} ({:?})", node.name(), node.attribute_type());
//! }
//! ```

mod description;
mod error;
mod layer;
mod memory;
mod node;

pub use description::{
    AttributeDescription, CameraDescription, LayerDescription, MeshDescription, NodeDescription,
    PivotDescription, SceneDescription,
};
pub use error::{Error, Result};
pub use layer::{Layer, LayerElement, MappingMode, ReferenceMode};
pub use memory::{Attribute, Mesh, Node, NodeGraph, NodeId, NodeRef};
pub use node::{AttributeType, CameraAttribute, GeometricPivot, MeshData, SceneNode};
