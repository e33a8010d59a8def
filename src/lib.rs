/*!
kdtrace3d
========

**kdtrace3d** casts segments against a static triangle scene indexed by a
KD-tree whose leaves are linked to their neighbors with *ropes*. Following
the ropes lets a query walk from leaf to leaf without a traversal stack, as
described in "Stackless KD-Tree Traversal for High Performance GPU Ray
Tracing", Popov, Günther, Seidel, Slusallek, Eurographics 2007.

The tree is built offline. This crate loads it (either from the bit-packed
records written by the builder, or from already decoded nodes), validates it
once, and then answers closest-hit queries from any number of threads.

```rust
use kdtrace3d::bounding_volume::Aabb;
use kdtrace3d::math::Point;
use kdtrace3d::partitioning::{KdLeaf, KdNode, KdTree, LeafTriangleSlot};
use kdtrace3d::na::Point2;

// A single leaf holding a single triangle facing +z.
let bounds = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
let leaf = KdLeaf::new(bounds, &[LeafTriangleSlot::Triangle(0)], [None; 6]).unwrap();
let tree = KdTree::new(
    bounds,
    vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0), Point::new(0.0, 1.0, 0.0)],
    vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)],
    vec![0, 1, 2],
    vec![KdNode::Leaf { leaf: 0 }],
    vec![leaf],
    vec![],
)
.unwrap();

let hit = tree.trace(&Point::new(0.2, 0.2, 1.0), &Point::new(0.2, 0.2, -1.0));
assert_eq!(hit.triangle, Some(0));
assert!((hit.fraction - 0.5).abs() < 1.0e-5);
```
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![deny(unused_qualifications)]

extern crate alloc;

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod partitioning;
pub mod query;
pub mod utils;

mod real {
    /// The scalar type used throughout this crate.
    pub use f32 as Real;
}

/// Aliases for mathematical types.
pub mod math {
    pub use super::real::*;
    pub use na::{Point2, Point3, Vector2, Vector3};

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The dimension of the space multiplied by two.
    ///
    /// This is the number of faces of an axis-aligned box, hence the number
    /// of ropes attached to a KD-tree leaf.
    pub const TWO_DIM: usize = DIM * 2;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The texture-coordinate type.
    pub use Point2 as TexCoord;
}
