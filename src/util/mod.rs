//! Utility types shared by every backend.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`BoundingBox`] and math type re-exports from glam

mod error;
mod math;

pub use error::*;
pub use math::*;
