//! Non-persistent geometric queries.
//!
//! These are the stateless intersection primitives every KD-tree traversal
//! step relies on:
//!
//! * [`intersect_ray_aabb()`] and [`RaySlabs`] for ray/box slab tests.
//! * [`local_ray_intersection_with_triangle()`] for back-face culled
//!   ray/triangle tests.

pub use self::ray::{
    intersect_ray_aabb, local_ray_intersection_with_triangle, Ray, RaySlabs, SegmentRay,
    TriangleHit,
};

mod ray;
