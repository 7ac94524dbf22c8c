//! Per-vertex attribute layers.
//!
//! A layer stores normals, tangents, UVs or vertex colors of a mesh. How a
//! value is found for a given polygon vertex depends on two encodings:
//!
//! - [`MappingMode`] - what the layer's elements are attached to
//! - [`ReferenceMode`] - whether elements are stored directly or through an
//!   index table

use serde::{Deserialize, Serialize};

/// What the elements of a layer are attached to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMode {
    /// Mapping is undetermined.
    #[default]
    None,
    /// One element per control point.
    ByControlPoint,
    /// One element per polygon vertex.
    ByPolygonVertex,
    /// One element per polygon.
    ByPolygon,
    /// One element per edge.
    ByEdge,
    /// A single element for the whole mesh.
    AllSame,
}

/// How the element for a mapped index is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    /// The mapped index addresses the direct array.
    #[default]
    Direct,
    /// The mapped index addresses the index array only.
    Index,
    /// The mapped index addresses the index array, whose value addresses the
    /// direct array.
    IndexToDirect,
}

/// Read access to one attribute layer.
pub trait LayerElement {
    /// Element type (e.g. `Vec3` for normals).
    type Value: Copy;

    /// What elements are attached to.
    fn mapping_mode(&self) -> MappingMode;

    /// How elements are referenced.
    fn reference_mode(&self) -> ReferenceMode;

    /// Element of the direct array.
    fn direct(&self, index: usize) -> Option<Self::Value>;

    /// Entry of the index array.
    fn index(&self, index: usize) -> Option<usize>;

    /// Length of the direct array.
    fn direct_len(&self) -> usize;

    /// Length of the index array.
    fn index_len(&self) -> usize;
}

/// In-memory attribute layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layer<T> {
    pub mapping_mode: MappingMode,
    pub reference_mode: ReferenceMode,
    /// Element values.
    pub direct: Vec<T>,
    /// Indices into `direct`, used by [`ReferenceMode::IndexToDirect`].
    pub indices: Vec<u32>,
}

impl<T> Layer<T> {
    /// Layer with directly referenced values.
    pub fn direct(mapping_mode: MappingMode, values: Vec<T>) -> Self {
        Self {
            mapping_mode,
            reference_mode: ReferenceMode::Direct,
            direct: values,
            indices: Vec::new(),
        }
    }

    /// Layer whose values are looked up through an index table.
    pub fn indexed(mapping_mode: MappingMode, values: Vec<T>, indices: Vec<u32>) -> Self {
        Self {
            mapping_mode,
            reference_mode: ReferenceMode::IndexToDirect,
            direct: values,
            indices,
        }
    }
}

impl<T: Copy> LayerElement for Layer<T> {
    type Value = T;

    #[inline]
    fn mapping_mode(&self) -> MappingMode {
        self.mapping_mode
    }

    #[inline]
    fn reference_mode(&self) -> ReferenceMode {
        self.reference_mode
    }

    #[inline]
    fn direct(&self, index: usize) -> Option<T> {
        self.direct.get(index).copied()
    }

    #[inline]
    fn index(&self, index: usize) -> Option<usize> {
        self.indices.get(index).map(|&i| i as usize)
    }

    fn direct_len(&self) -> usize {
        self.direct.len()
    }

    fn index_len(&self) -> usize {
        self.indices.len()
    }
}
