//! A KD-tree with ropes, queried with stackless traversals.

pub use self::error::KdTreeError;
pub use self::kdtree::{KdTree, KdTreeBuffers, KdTreeHeader, LeafTriangles};
pub use self::leaf::{KdLeaf, LeafTriangleSlot, KD_TREE_MAX_LEAF_TRIANGLES};
pub use self::node::{KdNode, SplitAxis};
pub use self::packed::{PackedKdLeaf, PackedKdNode, PackedKdTreeHeader};
pub use self::trace_result::{TraceOptions, TraceResult, TraceStats, KD_TREE_MAX_ITERATIONS};

mod error;
mod exhaustive;
mod kdtree;
mod leaf;
mod node;
pub mod packed;
mod trace_result;
mod traversal;
