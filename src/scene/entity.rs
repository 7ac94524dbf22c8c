//! Backend-independent field sets for scene entities.
//!
//! Builders fill these records from the scene graph; each backend converts
//! them into its own camera, light and object representation.

use rand::Rng;

use crate::geom::Triangle;
use crate::util::{BoundingBox, Vec3};

// ============================================================================
// Camera
// ============================================================================

/// Pinhole camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraParams {
    pub origin: Vec3,
    /// Unit view direction.
    pub direction: Vec3,
    /// Unit up vector, not parallel to `direction`.
    pub up: Vec3,
    /// Horizontal field of view in radians.
    pub horizontal_fov: f32,
    /// Width / height.
    pub aspect_ratio: f32,
}

// ============================================================================
// Light
// ============================================================================

/// Spherical area light. A zero radius makes it a point light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightParams {
    pub position: Vec3,
    /// Distance along a shadow ray within which occluders are ignored.
    pub shadow_bias: f32,
    /// Number of shadow samples for an area light.
    pub subdivs: u32,
    pub radius: f32,
}

impl LightParams {
    pub const DEFAULT_SHADOW_BIAS: f32 = 0.04;
    pub const DEFAULT_SUBDIVS: u32 = 10;
    pub const DEFAULT_RADIUS: f32 = 1.0;

    /// Light at `position` with every other field at its default.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        self.radius <= 0.0
    }
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            shadow_bias: Self::DEFAULT_SHADOW_BIAS,
            subdivs: Self::DEFAULT_SUBDIVS,
            radius: Self::DEFAULT_RADIUS,
        }
    }
}

// ============================================================================
// Object
// ============================================================================

/// 8-bit RGB display color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Three independent uniform draws.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let r = rng.random::<u8>();
        let g = rng.random::<u8>();
        let b = rng.random::<u8>();
        Self { r, g, b }
    }

    /// Components scaled to `0.0..=1.0`.
    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }
}

/// Finished object data handed to a backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectParts {
    /// World-space triangles in polygon order.
    pub triangles: Vec<Triangle>,
    /// Box holding every triangle vertex.
    pub bounding_box: BoundingBox,
    pub color: Color,
}

/// Accumulates triangles for one object while its mesh is read.
#[derive(Debug, Default)]
pub struct ObjectBuilder {
    triangles: Vec<Triangle>,
    bounds: BoundingBox,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(triangles),
            bounds: BoundingBox::EMPTY,
        }
    }

    /// Append a triangle and widen the box to hold its vertices.
    pub fn push(&mut self, triangle: Triangle) {
        let Triangle { a, b, c } = triangle;
        self.bounds.min = a.min(b).min(c.min(self.bounds.min));
        self.bounds.max = a.max(b).max(c.max(self.bounds.max));
        self.triangles.push(triangle);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    pub fn finish(self, color: Color) -> ObjectParts {
        ObjectParts {
            triangles: self.triangles,
            bounding_box: self.bounds,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_light_defaults() {
        let light = LightParams::at(Vec3::ONE);
        assert_eq!(light.position, Vec3::ONE);
        assert_eq!(light.shadow_bias, 0.04);
        assert_eq!(light.subdivs, 10);
        assert_eq!(light.radius, 1.0);
        assert!(!light.is_point());
    }

    #[test]
    fn test_builder_bounds() {
        let mut builder = ObjectBuilder::new();
        assert!(builder.bounding_box().is_empty());

        builder.push(Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y));
        assert_eq!(builder.bounding_box().min, Vec3::ZERO);
        assert_eq!(builder.bounding_box().max, Vec3::new(1.0, 1.0, 0.0));

        builder.push(Triangle::new(Vec3::splat(-1.0), Vec3::X, Vec3::Z));
        let parts = builder.finish(Color::new(1, 2, 3));
        assert_eq!(parts.triangles.len(), 2);
        assert_eq!(parts.bounding_box.min, Vec3::splat(-1.0));
        assert_eq!(parts.bounding_box.max, Vec3::ONE);
        assert_eq!(parts.color, Color::new(1, 2, 3));
    }

    #[test]
    fn test_empty_builder() {
        let parts = ObjectBuilder::new().finish(Color::default());
        assert!(parts.triangles.is_empty());
        assert!(parts.bounding_box.is_empty());
    }

    #[test]
    fn test_seeded_color() {
        let a = Color::random(&mut StdRng::seed_from_u64(7));
        let b = Color::random(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_color_to_vec3() {
        assert_eq!(Color::new(255, 0, 255).to_vec3(), Vec3::new(1.0, 0.0, 1.0));
    }
}
