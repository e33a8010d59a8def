//! Ray-casting related definitions and implementations.

#[doc(inline)]
pub use self::ray::{Ray, SegmentRay};
pub use self::ray_aabb::{intersect_ray_aabb, RaySlabs};
pub use self::ray_triangle::{local_ray_intersection_with_triangle, TriangleHit};

#[doc(hidden)]
pub mod ray;
mod ray_aabb;
mod ray_triangle;
