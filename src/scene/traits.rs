//! Compile-time description of a backend's scene entities.
//!
//! A backend names its camera, light and object types through
//! [`SceneTypes`], then binds them to a builder with [`MakeSceneTraits`]:
//!
//! ```ignore
//! pub type SceneTraits = MakeSceneTraits<CpuSceneTypes, SceneFunctions<CpuSceneTypes>>;
//! ```
//!
//! Nothing here holds runtime data. Every loader is monomorphized per backend.

use std::marker::PhantomData;

use rand::Rng;
use scene_graph::SceneNode;

use crate::scene::{CameraParams, LightParams, ObjectParts};
use crate::util::{BoundingBox, Result};

// ============================================================================
// Entity capabilities
// ============================================================================

/// Camera representation of one backend.
pub trait SceneCamera: Sized + Send + Sync {
    fn from_params(params: CameraParams) -> Self;

    fn params(&self) -> CameraParams;
}

/// Light representation of one backend.
pub trait SceneLight: Sized + Send + Sync {
    fn from_params(params: LightParams) -> Self;

    fn params(&self) -> LightParams;
}

/// Object representation of one backend.
pub trait SceneObject: Sized + Send + Sync {
    fn from_parts(parts: ObjectParts) -> Self;

    fn bounding_box(&self) -> BoundingBox;

    fn triangle_count(&self) -> usize;
}

/// Entity types of one backend.
pub trait SceneTypes {
    /// Backend name used in logs.
    const NAME: &'static str;

    type Camera: SceneCamera;
    type Light: SceneLight;
    type Object: SceneObject;
}

// ============================================================================
// Builders
// ============================================================================

/// Converts scene graph nodes into the entities of `T`.
pub trait SceneBuilder<T: SceneTypes> {
    fn create_camera<N: SceneNode>(node: &N) -> Result<T::Camera>;

    fn create_light<N: SceneNode>(node: &N) -> Result<T::Light>;

    fn create_object<N: SceneNode, R: Rng + ?Sized>(node: &N, rng: &mut R) -> Result<T::Object>;
}

/// Entity types plus the builder that produces them.
pub trait SceneTraits {
    type Types: SceneTypes;
    type Functions: SceneBuilder<Self::Types>;
}

/// Binds a [`SceneTypes`] to a [`SceneBuilder`].
pub struct MakeSceneTraits<T, F>(PhantomData<(T, F)>);

impl<T, F> SceneTraits for MakeSceneTraits<T, F>
where
    T: SceneTypes,
    F: SceneBuilder<T>,
{
    type Types = T;
    type Functions = F;
}
