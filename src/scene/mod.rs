//! Backend-polymorphic scene ingestion.
//!
//! ## Structure
//!
//! - [`entity`] - Backend-independent field sets (`CameraParams`, `LightParams`, `ObjectParts`)
//! - [`traits`] - Capability traits a backend implements (`SceneTypes`, `SceneBuilder`, `SceneTraits`)
//! - [`functions`] - The shared builder `SceneFunctions` plus transform and layer helpers
//!
//! ## Usage
//!
//! ```ignore
//! use raytracer::backend::cpu::{self, CpuScene};
//!
//! let graph = scene_graph::NodeGraph::load("scene.json")?;
//! let scene = CpuScene::from_graph::<cpu::SceneTraits, _>(&graph, &mut rand::rng())?;
//! println!("{}", scene.stats());
//! ```

mod entity;
mod functions;
mod traits;

pub use entity::*;
pub use functions::*;
pub use traits::*;

use std::fmt;

use rand::Rng;
use scene_graph::{AttributeType, NodeGraph, SceneNode};

use crate::util::{BoundingBox, Result};

/// Cameras, lights and objects of one backend.
pub struct Scene<T: SceneTypes> {
    pub cameras: Vec<T::Camera>,
    pub lights: Vec<T::Light>,
    pub objects: Vec<T::Object>,
}

impl<T: SceneTypes> Default for Scene<T> {
    fn default() -> Self {
        Self {
            cameras: Vec::new(),
            lights: Vec::new(),
            objects: Vec::new(),
        }
    }
}

impl<T: SceneTypes> Scene<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the hierarchy below `root` (depth first, parents before
    /// children) and build one entity per camera, light and mesh node.
    ///
    /// The first builder error aborts the load.
    #[tracing::instrument(skip_all, fields(backend = T::NAME, root = root.name()))]
    pub fn load<S, N, R>(root: &N, rng: &mut R) -> Result<Self>
    where
        S: SceneTraits<Types = T>,
        N: SceneNode,
        R: Rng + ?Sized,
    {
        let mut scene = Self::new();
        let mut stack = root.children();
        stack.reverse();
        let mut visited = 1usize;

        while let Some(node) = stack.pop() {
            visited += 1;
            match node.attribute_type() {
                AttributeType::Camera => scene.cameras.push(S::Functions::create_camera(&node)?),
                AttributeType::Light => scene.lights.push(S::Functions::create_light(&node)?),
                AttributeType::Mesh => scene.objects.push(S::Functions::create_object(&node, rng)?),
                AttributeType::None => {}
            }
            stack.extend(node.children().into_iter().rev());
        }

        tracing::debug!(nodes = visited, "scene graph walked");
        tracing::info!("{}", scene.stats());
        Ok(scene)
    }

    /// Load every node of an in-memory graph.
    pub fn from_graph<S, R>(graph: &NodeGraph, rng: &mut R) -> Result<Self>
    where
        S: SceneTraits<Types = T>,
        R: Rng + ?Sized,
    {
        Self::load::<S, _, _>(&graph.root(), rng)
    }

    /// First camera in load order.
    pub fn camera(&self) -> Option<&T::Camera> {
        self.cameras.first()
    }

    pub fn stats(&self) -> SceneStats {
        let mut bounds = BoundingBox::EMPTY;
        let mut triangles = 0;
        for object in &self.objects {
            bounds.expand_by_box(&object.bounding_box());
            triangles += object.triangle_count();
        }
        SceneStats {
            backend: T::NAME,
            cameras: self.cameras.len(),
            lights: self.lights.len(),
            objects: self.objects.len(),
            triangles,
            bounds,
        }
    }
}

/// Entity counts of a loaded scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneStats {
    pub backend: &'static str,
    pub cameras: usize,
    pub lights: usize,
    pub objects: usize,
    pub triangles: usize,
    /// Union of all object bounds.
    pub bounds: BoundingBox,
}

impl fmt::Display for SceneStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} camera(s), {} light(s), {} object(s), {} triangle(s)",
            self.backend, self.cameras, self.lights, self.objects, self.triangles
        )?;
        if !self.bounds.is_empty() {
            write!(f, ", bounds {:?}", self.bounds)?;
        }
        Ok(())
    }
}
