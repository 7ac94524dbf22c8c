//! Geometric primitives used by scene ingestion and rendering.

mod ray;
mod triangle;

pub use ray::Ray;
pub use triangle::{Triangle, TriangleHit};
