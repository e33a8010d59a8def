use super::{KdLeaf, KdNode, KdTreeError, LeafTriangleSlot, KD_TREE_MAX_LEAF_TRIANGLES};
use crate::bounding_volume::{Aabb, BoxFace};
use crate::math::{Point, Real, TexCoord};
use alloc::vec::Vec;

/// The summary of a [`KdTree`]: its root bounds and the size of its buffers.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct KdTreeHeader {
    /// The bounding box of the whole tree.
    pub bounds: Aabb,
    /// The number of vertices.
    pub num_vertices: usize,
    /// The number of texture coordinates.
    pub num_uvs: usize,
    /// The number of elements of the index buffer (three per triangle).
    pub num_indices: usize,
    /// The number of nodes.
    pub num_nodes: usize,
    /// The number of leaf records.
    pub num_leaves: usize,
    /// The number of elements of the overflow buffer.
    pub num_overflow: usize,
}

/// A KD-tree with ropes over a static triangle mesh.
///
/// The tree is a set of flat, immutable buffers addressed by `u32` indices:
/// the geometry (`vertices`, `uvs`, `indices`), the nodes (the root being
/// `nodes[0]`), the leaf records, and the overflow buffer continuing the
/// triangle lists of crowded leaves.
///
/// A `KdTree` can only be obtained through one of its validating constructors
/// ([`KdTree::new`], [`KdTree::from_packed`]), and cannot be modified
/// afterwards. Queries take `&self` and use no interior mutability, so a tree
/// can be shared across threads (e.g. behind an `Arc`) and queried
/// concurrently.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde-serialize",
    serde(try_from = "KdTreeBuffers", into = "KdTreeBuffers")
)]
pub struct KdTree {
    pub(super) header: KdTreeHeader,
    pub(super) vertices: Vec<Point<Real>>,
    pub(super) uvs: Vec<TexCoord<Real>>,
    pub(super) indices: Vec<u32>,
    pub(super) nodes: Vec<KdNode>,
    pub(super) leaves: Vec<KdLeaf>,
    pub(super) overflow: Vec<LeafTriangleSlot>,
}

static_assertions::assert_impl_all!(KdTree: Send, Sync);

/// The raw buffers of a [`KdTree`], before validation.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct KdTreeBuffers {
    /// The bounding box of the whole tree.
    pub bounds: Aabb,
    /// The mesh vertices.
    pub vertices: Vec<Point<Real>>,
    /// The texture coordinates of each vertex. May be empty.
    pub uvs: Vec<TexCoord<Real>>,
    /// The index buffer, three consecutive elements per triangle.
    pub indices: Vec<u32>,
    /// The tree nodes, root first.
    pub nodes: Vec<KdNode>,
    /// The leaf records.
    pub leaves: Vec<KdLeaf>,
    /// The continuation of the triangle lists that do not fit in their leaf.
    pub overflow: Vec<LeafTriangleSlot>,
}

impl TryFrom<KdTreeBuffers> for KdTree {
    type Error = KdTreeError;

    fn try_from(buffers: KdTreeBuffers) -> Result<Self, KdTreeError> {
        KdTree::from_buffers(buffers)
    }
}

impl From<KdTree> for KdTreeBuffers {
    fn from(tree: KdTree) -> Self {
        KdTreeBuffers {
            bounds: tree.header.bounds,
            vertices: tree.vertices,
            uvs: tree.uvs,
            indices: tree.indices,
            nodes: tree.nodes,
            leaves: tree.leaves,
            overflow: tree.overflow,
        }
    }
}

impl KdTree {
    /// Loads a KD-tree from its buffers.
    ///
    /// `uvs` must either be empty, in which case every hit reports a zero
    /// texture coordinate, or contain one element per vertex.
    ///
    /// Returns an error if the buffers are inconsistent: indices referencing
    /// missing vertices, nodes, leaves, triangles or overflow elements, or
    /// interior nodes whose children are not stored after them.
    pub fn new(
        bounds: Aabb,
        vertices: Vec<Point<Real>>,
        uvs: Vec<TexCoord<Real>>,
        indices: Vec<u32>,
        nodes: Vec<KdNode>,
        leaves: Vec<KdLeaf>,
        overflow: Vec<LeafTriangleSlot>,
    ) -> Result<Self, KdTreeError> {
        Self::from_buffers(KdTreeBuffers {
            bounds,
            vertices,
            uvs,
            indices,
            nodes,
            leaves,
            overflow,
        })
    }

    /// Loads a KD-tree from its buffers. See [`KdTree::new`].
    pub fn from_buffers(buffers: KdTreeBuffers) -> Result<Self, KdTreeError> {
        let KdTreeBuffers {
            bounds,
            vertices,
            uvs,
            indices,
            nodes,
            leaves,
            overflow,
        } = buffers;

        let header = KdTreeHeader {
            bounds,
            num_vertices: vertices.len(),
            num_uvs: uvs.len(),
            num_indices: indices.len(),
            num_nodes: nodes.len(),
            num_leaves: leaves.len(),
            num_overflow: overflow.len(),
        };

        let tree = KdTree {
            header,
            vertices,
            uvs,
            indices,
            nodes,
            leaves,
            overflow,
        };
        tree.validate()?;

        log::trace!(
            "Loaded KD-tree: {} triangles, {} nodes, {} leaves, {} overflow slots.",
            tree.num_triangles(),
            tree.header.num_nodes,
            tree.header.num_leaves,
            tree.header.num_overflow
        );

        Ok(tree)
    }

    fn validate(&self) -> Result<(), KdTreeError> {
        let header = &self.header;

        if self.nodes.is_empty() {
            return Err(KdTreeError::EmptyNodes);
        }

        if !header.bounds.is_valid() {
            return Err(KdTreeError::InvalidRootBounds);
        }

        if self.indices.len() % 3 != 0 {
            return Err(KdTreeError::IndicesNotTriangles(self.indices.len()));
        }

        if !self.uvs.is_empty() && self.uvs.len() != self.vertices.len() {
            return Err(KdTreeError::UvCountMismatch {
                uvs: self.uvs.len(),
                vertices: self.vertices.len(),
            });
        }

        for (index, vertex) in self.indices.iter().enumerate() {
            if *vertex as usize >= self.vertices.len() {
                return Err(KdTreeError::VertexOutOfBounds {
                    index,
                    vertex: *vertex,
                    num_vertices: self.vertices.len(),
                });
            }
        }

        for (id, node) in self.nodes.iter().enumerate() {
            let id = id as u32;
            match *node {
                KdNode::Interior { children, .. } => {
                    if children as usize + 1 >= self.nodes.len() {
                        return Err(KdTreeError::ChildOutOfBounds {
                            node: id,
                            children,
                            num_nodes: self.nodes.len(),
                        });
                    }

                    // Guarantees that descending through interior nodes terminates.
                    if children <= id {
                        return Err(KdTreeError::ChildBeforeParent { node: id, children });
                    }
                }
                KdNode::Leaf { leaf } => {
                    if leaf as usize >= self.leaves.len() {
                        return Err(KdTreeError::LeafOutOfBounds {
                            node: id,
                            leaf,
                            num_leaves: self.leaves.len(),
                        });
                    }
                }
            }
        }

        for (id, leaf) in self.leaves.iter().enumerate() {
            let id = id as u32;

            if !leaf.bounds.is_valid() {
                return Err(KdTreeError::InvalidLeafBounds(id));
            }

            for face in BoxFace::ALL {
                if let Some(node) = leaf.rope(face) {
                    if node as usize >= self.nodes.len() {
                        return Err(KdTreeError::RopeOutOfBounds {
                            leaf: id,
                            face,
                            node,
                            num_nodes: self.nodes.len(),
                        });
                    }
                }
            }

            for slot in &leaf.triangles {
                self.validate_slot(slot)?;
            }
        }

        for slot in &self.overflow {
            self.validate_slot(slot)?;
        }

        Ok(())
    }

    fn validate_slot(&self, slot: &LeafTriangleSlot) -> Result<(), KdTreeError> {
        match *slot {
            LeafTriangleSlot::Triangle(triangle) => {
                if triangle as usize >= self.num_triangles() {
                    return Err(KdTreeError::TriangleOutOfBounds {
                        triangle,
                        num_triangles: self.num_triangles(),
                    });
                }
            }
            LeafTriangleSlot::OverflowPointer(offset) => {
                if offset as usize >= self.overflow.len() {
                    return Err(KdTreeError::OverflowOutOfBounds {
                        offset,
                        num_overflow: self.overflow.len(),
                    });
                }
            }
            LeafTriangleSlot::EndOfList => {}
        }

        Ok(())
    }

    /// The root bounds and buffer sizes of this tree.
    #[inline]
    pub fn header(&self) -> &KdTreeHeader {
        &self.header
    }

    /// The bounding box of the whole tree.
    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.header.bounds
    }

    /// The mesh vertices.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The texture coordinates of the mesh vertices. Empty if the mesh has none.
    #[inline]
    pub fn uvs(&self) -> &[TexCoord<Real>] {
        &self.uvs
    }

    /// The index buffer, three consecutive elements per triangle.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// The tree nodes, the root being the first one.
    #[inline]
    pub fn nodes(&self) -> &[KdNode] {
        &self.nodes
    }

    /// The leaf records.
    #[inline]
    pub fn leaves(&self) -> &[KdLeaf] {
        &self.leaves
    }

    /// The overflow buffer.
    #[inline]
    pub fn overflow(&self) -> &[LeafTriangleSlot] {
        &self.overflow
    }

    /// The number of triangles of the mesh.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// The vertex indices of the `i`-th triangle.
    #[inline]
    pub fn triangle_indices(&self, i: u32) -> Option<[u32; 3]> {
        let first = i as usize * 3;
        let ids = self.indices.get(first..first + 3)?;
        Some([ids[0], ids[1], ids[2]])
    }

    /// The vertices of the `i`-th triangle.
    #[inline]
    pub fn triangle(&self, i: u32) -> Option<[Point<Real>; 3]> {
        self.triangle_indices(i)
            .map(|ids| ids.map(|id| self.vertices[id as usize]))
    }

    /// The triangles listed by the `leaf`-th leaf record, overflow included.
    ///
    /// Returns `None` if there is no such leaf.
    #[inline]
    pub fn leaf_triangles(&self, leaf: u32) -> Option<LeafTriangles<'_>> {
        self.leaves
            .get(leaf as usize)
            .map(|leaf| LeafTriangles::new(leaf, &self.overflow))
    }
}

/// Iterator through the triangles listed by a leaf, following its overflow
/// chain.
///
/// A chain starting at the overflow offset `o` is never read past the end of
/// the overflow buffer. The total number of slots read is bounded by
/// [`KD_TREE_MAX_LEAF_TRIANGLES`] plus the overflow buffer length, so cyclic
/// chains terminate.
#[derive(Clone, Debug)]
pub struct LeafTriangles<'a> {
    slots: &'a [LeafTriangleSlot],
    overflow: &'a [LeafTriangleSlot],
    remaining_reads: usize,
}

impl<'a> LeafTriangles<'a> {
    /// Iterates through the triangle list of `leaf`, using `overflow` as the
    /// overflow buffer.
    #[inline]
    pub fn new(leaf: &'a KdLeaf, overflow: &'a [LeafTriangleSlot]) -> Self {
        Self {
            slots: &leaf.triangles,
            overflow,
            remaining_reads: KD_TREE_MAX_LEAF_TRIANGLES + overflow.len(),
        }
    }
}

impl Iterator for LeafTriangles<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if self.remaining_reads == 0 {
                return None;
            }

            let (slot, rest) = self.slots.split_first()?;
            self.remaining_reads -= 1;

            match *slot {
                LeafTriangleSlot::Triangle(triangle) => {
                    self.slots = rest;
                    return Some(triangle);
                }
                LeafTriangleSlot::OverflowPointer(offset) => {
                    self.slots = self.overflow.get(offset as usize..).unwrap_or(&[]);
                }
                LeafTriangleSlot::EndOfList => {
                    self.slots = &[];
                    return None;
                }
            }
        }
    }
}
