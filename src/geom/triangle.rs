//! World-space triangles.

use crate::geom::Ray;
use crate::util::{BoundingBox, Vec3};

/// Triangle with its three corners in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

/// Ray/triangle hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleHit {
    /// Distance along the ray.
    pub t: f32,
    /// Barycentric weight of `b`.
    pub u: f32,
    /// Barycentric weight of `c`.
    pub v: f32,
}

impl Triangle {
    #[inline]
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    /// Face normal, not normalized.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a)
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices())
    }

    /// Two-sided Möller–Trumbore intersection. Only hits inside
    /// `(t_min, ray.max_distance)` are reported.
    pub fn intersect(&self, ray: &Ray, t_min: f32) -> Option<TriangleHit> {
        const EPSILON: f32 = 1e-9;

        let e1 = self.b - self.a;
        let e2 = self.c - self.a;

        let ray_cross_e2 = ray.direction.cross(e2);
        let det = e1.dot(ray_cross_e2);
        if det.abs() < EPSILON {
            return None; // Parallel or degenerate
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self.a;
        let u = inv_det * s.dot(ray_cross_e2);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let s_cross_e1 = s.cross(e1);
        let v = inv_det * ray.direction.dot(s_cross_e1);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * e2.dot(s_cross_e1);
        (t > t_min && t < ray.max_distance).then_some(TriangleHit { t, u, v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Triangle {
        Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y)
    }

    #[test]
    fn test_normal_and_bounds() {
        let tri = unit();
        assert_eq!(tri.normal(), Vec3::Z);
        let b = tri.bounding_box();
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_hit_front_and_back() {
        let front = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::NEG_Z);
        let hit = unit().intersect(&front, 0.0).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-6);
        assert!((hit.u - 0.25).abs() < 1e-6);
        assert!((hit.v - 0.25).abs() < 1e-6);

        let back = Ray::new(Vec3::new(0.25, 0.25, -1.0), Vec3::Z);
        assert!(unit().intersect(&back, 0.0).is_some());
    }

    #[test]
    fn test_miss_outside() {
        let ray = Ray::new(Vec3::new(0.75, 0.75, 1.0), Vec3::NEG_Z);
        assert!(unit().intersect(&ray, 0.0).is_none());
    }

    #[test]
    fn test_miss_parallel() {
        let ray = Ray::new(Vec3::new(-1.0, 0.25, 0.0), Vec3::X);
        assert!(unit().intersect(&ray, 0.0).is_none());
    }

    #[test]
    fn test_respects_limits() {
        let ray = Ray::towards(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.25, 0.25, 0.5));
        assert!(unit().intersect(&ray, 0.0).is_none());

        let ray = Ray::new(Vec3::new(0.25, 0.25, 0.01), Vec3::NEG_Z);
        assert!(unit().intersect(&ray, 0.04).is_none());
        assert!(unit().intersect(&ray, 0.0).is_some());
    }
}
