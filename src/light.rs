//! Shadow ray generation for point and area lights.
//!
//! An area light is a disk of `radius` around the light position, turned to
//! face the shaded point. Its samples follow a golden-angle (Vogel) spiral,
//! which spreads any number of points evenly over the disk without a random
//! source. Identical inputs always produce identical rays.

use smallvec::{smallvec, SmallVec};

use crate::geom::Ray;
use crate::scene::LightParams;
use crate::util::Vec3;

/// Shadow rays from one shaded point. Default subdivision counts stay inline.
pub type SecondaryRays = SmallVec<[Ray; 16]>;

/// `π * (3 - √5)`
pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Sample positions on the light, as seen from `from`.
///
/// A point light yields its position once. An area light yields
/// `max(subdivs, 1)` points, all within `radius` of the position.
pub fn light_samples(light: &LightParams, from: Vec3) -> SmallVec<[Vec3; 16]> {
    if light.is_point() {
        return smallvec![light.position];
    }

    let count = light.subdivs.max(1);
    let normal = (from - light.position).normalize_or(Vec3::Z);
    let (u, v) = normal.any_orthonormal_pair();

    (0..count)
        .map(|i| {
            let r = light.radius * ((i as f32 + 0.5) / count as f32).sqrt();
            let (sin, cos) = (i as f32 * GOLDEN_ANGLE).sin_cos();
            light.position + (u * cos + v * sin) * r
        })
        .collect()
}

/// Rays from the point `distance` along `primary` toward each light sample.
///
/// Every ray is normalized and bounded by the distance to its sample. The
/// light's shadow bias is left to the caller.
pub fn spawn_secondary_rays(light: &LightParams, primary: &Ray, distance: f32) -> SecondaryRays {
    let hit = primary.origin + primary.direction * distance;
    light_samples(light, hit)
        .into_iter()
        .map(|sample| Ray::towards(hit, sample))
        .collect()
}
