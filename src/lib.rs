//! # Raytracer
//!
//! Offline ray tracer that imports cameras, lights and meshes from a scene
//! graph and renders them with interchangeable backends.
//!
//! Scene ingestion is written once: each backend only declares its camera,
//! light and object types (a [`SceneTypes`](scene::SceneTypes)) and the
//! shared builder is monomorphized for it.
//!
//! ## Modules
//!
//! - [`util`] - Errors, bounding boxes, math re-exports
//! - [`geom`] - Rays and triangles
//! - [`scene`] - Capability traits, the shared builder and the scene container
//! - [`light`] - Shadow ray generation for point and area lights
//! - [`backend`] - CPU renderer and GPU buffer packing
//! - [`config`] - Render settings
//!
//! ## Example
//!
//! ```ignore
//! use raytracer::prelude::*;
//!
//! let graph = NodeGraph::load("scene.json")?;
//! let scene = CpuScene::from_graph::<cpu::SceneTraits, _>(&graph, &mut rand::rng())?;
//! let image = cpu::render(&scene, &RenderSettings::default())?;
//! cpu::save_png(&image, "render.png")?;
//! ```

pub mod backend;
pub mod config;
pub mod geom;
pub mod light;
pub mod scene;
pub mod util;

// Re-export commonly used types
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backend::cpu::{self, CpuScene, CpuSceneTypes};
    pub use crate::backend::gpu::{self, GpuScene, GpuSceneTypes};
    pub use crate::backend::Backend;
    pub use crate::config::RenderSettings;
    pub use crate::geom::{Ray, Triangle};
    pub use crate::light::spawn_secondary_rays;
    pub use crate::scene::{
        CameraParams, LightParams, ObjectParts, Scene, SceneBuilder, SceneCamera, SceneLight,
        SceneObject, SceneStats, SceneTraits, SceneTypes,
    };
    pub use crate::util::{BoundingBox, Error, Result};
    pub use scene_graph::{NodeGraph, SceneNode};
}
