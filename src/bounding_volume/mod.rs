//! Bounding volumes.

#[doc(inline)]
pub use crate::bounding_volume::aabb::{Aabb, BoxFace};

#[doc(hidden)]
pub mod aabb;
