//! Math type re-exports and renderer-specific math utilities.
//!
//! This module re-exports types from `glam` and provides the axis-aligned
//! bounding box shared by every backend.

// Re-export glam types
pub use glam::{Mat4, Vec2, Vec3, Vec4};

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Axis-aligned bounding box with single precision.
#[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Empty bounding box (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create a new bounding box from min and max points.
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box holding all points. Empty for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut b = Self::EMPTY;
        for p in points {
            b.expand_by_point(p);
        }
        b
    }

    /// Check if this box is empty (has no volume).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this box to include a point.
    #[inline]
    pub fn expand_by_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Expand this box to include another box.
    #[inline]
    pub fn expand_by_box(&mut self, other: &Self) {
        if !other.is_empty() {
            self.min = self.min.min(other.min);
            self.max = self.max.max(other.max);
        }
    }

    /// True when `p` lies inside or on the boundary.
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundingBox({:?} - {:?})", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let mut b = BoundingBox::EMPTY;
        assert!(b.is_empty());
        assert!(!b.contains(Vec3::ZERO));

        b.expand_by_point(Vec3::ZERO);
        assert!(!b.is_empty());
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.max, Vec3::ZERO);
        assert!(b.contains(Vec3::ZERO));

        b.expand_by_point(Vec3::ONE);
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.max, Vec3::ONE);
        assert!(b.contains(Vec3::splat(0.25)));
        assert!(!b.contains(Vec3::new(0.5, 0.5, 1.5)));
    }

    #[test]
    fn test_expand_by_empty_box() {
        let mut b = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
        b.expand_by_box(&BoundingBox::EMPTY);
        assert_eq!(b, BoundingBox::new(Vec3::ZERO, Vec3::ONE));

        b.expand_by_box(&BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(-1.0)));
        assert_eq!(b.min, Vec3::splat(-1.0));
    }

    #[test]
    fn test_from_points() {
        assert!(BoundingBox::from_points(std::iter::empty()).is_empty());
        let b = BoundingBox::from_points([Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 2.0, 3.0)]);
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_bounding_box_pod() {
        assert_eq!(std::mem::size_of::<BoundingBox>(), 24);
    }
}
