//! Rays and ray/box tests.

use crate::util::{BoundingBox, Vec3};

/// Half-line with an optional far limit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
    /// Largest distance along the ray that counts as a hit.
    pub max_distance: f32,
}

impl Ray {
    /// Unbounded ray. `direction` is normalized.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            max_distance: f32::INFINITY,
        }
    }

    /// Ray from `origin` to `target`, limited to their distance.
    ///
    /// When both points coincide the direction is zero and the limit is zero.
    #[inline]
    pub fn towards(origin: Vec3, target: Vec3) -> Self {
        let offset = target - origin;
        let distance = offset.length();
        Self {
            origin,
            direction: offset.normalize_or_zero(),
            max_distance: distance,
        }
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// End point of a bounded ray.
    #[inline]
    pub fn target(&self) -> Vec3 {
        self.at(self.max_distance)
    }

    /// Slab test. Returns the entry distance (zero when starting inside) if
    /// the box is hit within `[0, max_distance]`.
    pub fn intersect_box(&self, bounds: &BoundingBox) -> Option<f32> {
        const EPSILON: f32 = 1e-8;

        if bounds.is_empty() {
            return None;
        }

        // Clamp near-zero components so the inverse stays finite.
        let inv_dir = self.direction.map(|d| {
            if d.abs() < EPSILON {
                1.0 / EPSILON.copysign(d)
            } else {
                1.0 / d
            }
        });

        let t0 = (bounds.min - self.origin) * inv_dir;
        let t1 = (bounds.max - self.origin) * inv_dir;

        let t_near = t0.min(t1).max_element();
        let t_far = t0.max(t1).min_element();

        if t_near > t_far || t_far < 0.0 || t_near > self.max_distance {
            return None;
        }
        Some(t_near.max(0.0))
    }
}
