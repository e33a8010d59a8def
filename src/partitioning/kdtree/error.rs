use crate::bounding_volume::BoxFace;

/// Indicates an inconsistency in the buffers a KD-tree is loaded from.
///
/// These are detected once, when the tree is loaded, so that queries never
/// have to check indices.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum KdTreeError {
    /// A KD-tree must contain at least one node.
    #[error("a KD-tree must contain at least one node.")]
    EmptyNodes,
    /// The root bounding box has `mins > maxs` along some axis, or is NaN.
    #[error("the root bounding box is invalid.")]
    InvalidRootBounds,
    /// The index buffer length is not a multiple of three.
    #[error("the index buffer has {0} elements, which is not a multiple of 3.")]
    IndicesNotTriangles(usize),
    /// The texture-coordinate buffer is neither empty nor parallel to the vertex buffer.
    #[error("the uv buffer has {uvs} elements while there are {vertices} vertices.")]
    UvCountMismatch {
        /// The number of texture coordinates.
        uvs: usize,
        /// The number of vertices.
        vertices: usize,
    },
    /// A count declared by a packed header does not match the provided buffer.
    #[error("the header declares {declared} {buffer} but {actual} were provided.")]
    HeaderCountMismatch {
        /// The name of the buffer.
        buffer: &'static str,
        /// The count declared by the header.
        declared: i32,
        /// The actual length of the buffer.
        actual: usize,
    },
    /// A triangle corner references a vertex that does not exist.
    #[error("the index {index} references the vertex {vertex} but there are only {num_vertices} vertices.")]
    VertexOutOfBounds {
        /// The position of the faulty element in the index buffer.
        index: usize,
        /// The referenced vertex.
        vertex: u32,
        /// The number of vertices.
        num_vertices: usize,
    },
    /// The two children of an interior node are not both valid nodes.
    #[error("the node {node} references the child pair at offset {children} but there are only {num_nodes} nodes.")]
    ChildOutOfBounds {
        /// The faulty interior node.
        node: u32,
        /// Its child-group offset.
        children: u32,
        /// The number of nodes.
        num_nodes: usize,
    },
    /// The children of an interior node must be stored after it.
    #[error("the node {node} references the children {children}, which are not stored after it.")]
    ChildBeforeParent {
        /// The faulty interior node.
        node: u32,
        /// Its child-group offset.
        children: u32,
    },
    /// A leaf node references a leaf record that does not exist.
    #[error("the node {node} references the leaf {leaf} but there are only {num_leaves} leaves.")]
    LeafOutOfBounds {
        /// The faulty leaf node.
        node: u32,
        /// The referenced leaf record.
        leaf: u32,
        /// The number of leaf records.
        num_leaves: usize,
    },
    /// A leaf was given more slots than it stores inline.
    #[error("a KD-tree leaf stores at most 4 slots inline, got {0}.")]
    TooManyInlineSlots(usize),
    /// A leaf has `mins > maxs` along some axis, or NaN bounds.
    #[error("the leaf {0} has invalid bounds.")]
    InvalidLeafBounds(u32),
    /// A rope references a node that does not exist.
    #[error("the {face:?} rope of leaf {leaf} references the node {node} but there are only {num_nodes} nodes.")]
    RopeOutOfBounds {
        /// The faulty leaf record.
        leaf: u32,
        /// The face carrying the rope.
        face: BoxFace,
        /// The referenced node.
        node: u32,
        /// The number of nodes.
        num_nodes: usize,
    },
    /// A triangle list references a triangle that does not exist.
    #[error("a triangle list references the triangle {triangle} but there are only {num_triangles} triangles.")]
    TriangleOutOfBounds {
        /// The referenced triangle.
        triangle: u32,
        /// The number of triangles.
        num_triangles: usize,
    },
    /// A triangle list continues past the end of the overflow buffer.
    #[error("a triangle list continues at the overflow offset {offset} but the overflow buffer has only {num_overflow} elements.")]
    OverflowOutOfBounds {
        /// The referenced overflow offset.
        offset: u32,
        /// The length of the overflow buffer.
        num_overflow: usize,
    },
    /// A packed interior node uses the reserved split axis 3.
    #[error("the packed node {0} has an invalid split axis.")]
    InvalidSplitAxis(u32),
    /// A packed rope is negative without being the `-1` "no neighbor" marker.
    #[error("the packed leaf {leaf} has the invalid rope value {value}.")]
    InvalidPackedRope {
        /// The faulty leaf record.
        leaf: u32,
        /// The packed rope value.
        value: i32,
    },
}
