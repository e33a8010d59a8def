//! Spatial partitioning tools.

pub use self::kdtree::{
    KdLeaf, KdNode, KdTree, KdTreeBuffers, KdTreeError, KdTreeHeader, LeafTriangleSlot,
    LeafTriangles, PackedKdLeaf, PackedKdNode, PackedKdTreeHeader, SplitAxis, TraceOptions,
    TraceResult, TraceStats, KD_TREE_MAX_ITERATIONS, KD_TREE_MAX_LEAF_TRIANGLES,
};

pub mod kdtree;
