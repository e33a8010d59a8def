//! The bit-packed records written by the offline KD-tree builder.
//!
//! These mirror the builder's binary layout so a loaded blob can be
//! reinterpreted in place (see the `bytemuck-serialize` feature) and then
//! decoded into the tagged [`KdNode`], [`KdLeaf`] and [`LeafTriangleSlot`]
//! representation with [`KdTree::from_packed`].

use super::{
    KdLeaf, KdNode, KdTree, KdTreeError, LeafTriangleSlot, SplitAxis, KD_TREE_MAX_LEAF_TRIANGLES,
};
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, TexCoord, TWO_DIM};
use alloc::vec::Vec;

const LEAF_FLAG: u32 = 0b1;
const AXIS_SHIFT: u32 = 1;
const AXIS_MASK: u32 = 0b11;
const PAYLOAD_SHIFT: u32 = 3;
/// The largest child-group offset or leaf index a packed node can hold.
pub const MAX_PACKED_PAYLOAD: u32 = u32::MAX >> PAYLOAD_SHIFT;
/// The largest triangle index, overflow offset, or rope a packed leaf can hold.
///
/// `i32::MAX` itself is excluded: as an overflow offset it would encode to the
/// `-1` end-of-list marker.
pub const MAX_PACKED_SLOT_VALUE: u32 = i32::MAX as u32 - 1;
const OVERFLOW_POINTER_BIT: u32 = 0x8000_0000;
const NONE_MARKER: i32 = -1;

/// The header of a packed KD-tree.
#[cfg_attr(
    feature = "bytemuck-serialize",
    derive(bytemuck::Pod, bytemuck::Zeroable)
)]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct PackedKdTreeHeader {
    /// The number of vertices.
    pub num_vertices: i32,
    /// The number of texture coordinates.
    pub num_uvs: i32,
    /// The number of elements of the index buffer.
    pub num_indices: i32,
    /// The number of nodes.
    pub num_nodes: i32,
    /// The number of leaf records.
    pub num_leafs: i32,
    /// The number of elements of the overflow buffer.
    pub num_overflow: i32,
    /// The `[mins, maxs]` corners of the root bounding box.
    pub bounds: [[Real; 3]; 2],
}

/// A packed KD-tree node.
///
/// `data` packs, from the least significant bit:
/// - bit 0: the leaf flag;
/// - bits 1 and 2: the split axis of an interior node (0 = x, 1 = y,
///   2 = z, 3 is invalid);
/// - bits 3 to 31: the child-group offset of an interior node, or the leaf
///   record index of a leaf node.
///
/// `dist` is the coordinate of the splitting plane of an interior node.
#[cfg_attr(
    feature = "bytemuck-serialize",
    derive(bytemuck::Pod, bytemuck::Zeroable)
)]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct PackedKdNode {
    /// The packed leaf flag, split axis, and child or leaf index.
    pub data: u32,
    /// The splitting plane coordinate.
    pub dist: Real,
}

/// A packed KD-tree leaf record.
#[cfg_attr(
    feature = "bytemuck-serialize",
    derive(bytemuck::Pod, bytemuck::Zeroable)
)]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct PackedKdLeaf {
    /// The inline triangle list, see [`LeafTriangleSlot::from_packed`].
    pub triangles: [i32; KD_TREE_MAX_LEAF_TRIANGLES],
    /// The node index of each rope, in [`BoxFace`](crate::bounding_volume::BoxFace)
    /// order, or `-1` for no neighbor.
    pub ropes: [i32; TWO_DIM],
    /// The `[mins, maxs]` corners of the leaf cell.
    pub bounds: [[Real; 3]; 2],
}

static_assertions::assert_eq_size!(PackedKdTreeHeader, [u8; 48]);
static_assertions::assert_eq_size!(PackedKdNode, [u8; 8]);
static_assertions::assert_eq_size!(PackedKdLeaf, [u8; 64]);

impl PackedKdNode {
    /// Packs a leaf node referencing the leaf record `leaf`.
    ///
    /// `leaf` must not exceed [`MAX_PACKED_PAYLOAD`], its high bits are lost
    /// otherwise.
    #[inline]
    pub fn leaf(leaf: u32) -> Self {
        debug_assert!(leaf <= MAX_PACKED_PAYLOAD, "leaf index {leaf} does not fit a packed node.");
        Self {
            data: (leaf << PAYLOAD_SHIFT) | LEAF_FLAG,
            dist: 0.0,
        }
    }

    /// Packs an interior node.
    ///
    /// `children` must not exceed [`MAX_PACKED_PAYLOAD`], its high bits are
    /// lost otherwise.
    #[inline]
    pub fn interior(axis: SplitAxis, split: Real, children: u32) -> Self {
        debug_assert!(
            children <= MAX_PACKED_PAYLOAD,
            "child offset {children} does not fit a packed node."
        );
        Self {
            data: (children << PAYLOAD_SHIFT) | ((axis as u32) << AXIS_SHIFT),
            dist: split,
        }
    }

    /// Packs a tagged node.
    #[inline]
    pub fn pack(node: &KdNode) -> Self {
        match *node {
            KdNode::Interior {
                axis,
                split,
                children,
            } => Self::interior(axis, split, children),
            KdNode::Leaf { leaf } => Self::leaf(leaf),
        }
    }

    /// Is the leaf flag set?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.data & LEAF_FLAG != 0
    }

    /// The child-group offset or leaf index stored by this node.
    #[inline]
    pub fn payload(&self) -> u32 {
        self.data >> PAYLOAD_SHIFT
    }

    /// Decodes this node. `id` is its own index, used to report errors.
    pub fn unpack(&self, id: u32) -> Result<KdNode, KdTreeError> {
        if self.is_leaf() {
            return Ok(KdNode::Leaf {
                leaf: self.payload(),
            });
        }

        let axis = SplitAxis::from_index(((self.data >> AXIS_SHIFT) & AXIS_MASK) as usize)
            .ok_or(KdTreeError::InvalidSplitAxis(id))?;

        Ok(KdNode::Interior {
            axis,
            split: self.dist,
            children: self.payload(),
        })
    }
}

impl LeafTriangleSlot {
    /// Decodes a packed triangle slot.
    ///
    /// Non-negative values are triangle indices, `-1` ends the list, and any
    /// other negative value is an overflow pointer whose offset is the value
    /// with its sign bit cleared.
    #[inline]
    pub fn from_packed(value: i32) -> Self {
        match value {
            NONE_MARKER => LeafTriangleSlot::EndOfList,
            v if v >= 0 => LeafTriangleSlot::Triangle(v as u32),
            v => LeafTriangleSlot::OverflowPointer(v as u32 & !OVERFLOW_POINTER_BIT),
        }
    }

    /// Encodes this slot in the packed format.
    ///
    /// Triangle indices and overflow offsets must not exceed
    /// [`MAX_PACKED_SLOT_VALUE`], they would be read back as a different slot
    /// otherwise.
    #[inline]
    pub fn to_packed(self) -> i32 {
        if let LeafTriangleSlot::Triangle(value) | LeafTriangleSlot::OverflowPointer(value) = self {
            debug_assert!(
                value <= MAX_PACKED_SLOT_VALUE,
                "{:?} does not fit a packed slot.",
                self
            );
        }

        match self {
            LeafTriangleSlot::Triangle(triangle) => triangle as i32,
            LeafTriangleSlot::OverflowPointer(offset) => (offset | OVERFLOW_POINTER_BIT) as i32,
            LeafTriangleSlot::EndOfList => NONE_MARKER,
        }
    }
}

impl PackedKdLeaf {
    /// Packs a tagged leaf record.
    ///
    /// Slots and ropes must not exceed [`MAX_PACKED_SLOT_VALUE`].
    pub fn pack(leaf: &KdLeaf) -> Self {
        Self {
            triangles: leaf.triangles.map(LeafTriangleSlot::to_packed),
            ropes: leaf.ropes.map(|rope| {
                rope.map(|node| {
                    debug_assert!(
                        node <= MAX_PACKED_SLOT_VALUE,
                        "rope {node} does not fit a packed leaf."
                    );
                    node as i32
                })
                .unwrap_or(NONE_MARKER)
            }),
            bounds: [leaf.bounds.mins.into(), leaf.bounds.maxs.into()],
        }
    }

    /// Decodes this leaf record. `id` is its own index, used to report errors.
    pub fn unpack(&self, id: u32) -> Result<KdLeaf, KdTreeError> {
        let mut ropes = [None; TWO_DIM];

        for (rope, value) in ropes.iter_mut().zip(self.ropes.iter()) {
            *rope = match *value {
                NONE_MARKER => None,
                v if v >= 0 => Some(v as u32),
                v => return Err(KdTreeError::InvalidPackedRope { leaf: id, value: v }),
            };
        }

        Ok(KdLeaf {
            bounds: Aabb::from_raw(self.bounds),
            triangles: self.triangles.map(LeafTriangleSlot::from_packed),
            ropes,
        })
    }
}

fn check_count(buffer: &'static str, declared: i32, actual: usize) -> Result<(), KdTreeError> {
    if usize::try_from(declared).ok() == Some(actual) {
        Ok(())
    } else {
        Err(KdTreeError::HeaderCountMismatch {
            buffer,
            declared,
            actual,
        })
    }
}

impl KdTree {
    /// Loads a KD-tree from the packed records of the offline builder.
    ///
    /// The counts of `header` must match the length of each buffer. The
    /// decoded tree is then validated as by [`KdTree::new`].
    pub fn from_packed(
        header: &PackedKdTreeHeader,
        vertices: Vec<Point<Real>>,
        uvs: Vec<TexCoord<Real>>,
        indices: Vec<u32>,
        nodes: &[PackedKdNode],
        leaves: &[PackedKdLeaf],
        overflow: &[i32],
    ) -> Result<Self, KdTreeError> {
        check_count("vertices", header.num_vertices, vertices.len())?;
        check_count("uvs", header.num_uvs, uvs.len())?;
        check_count("indices", header.num_indices, indices.len())?;
        check_count("nodes", header.num_nodes, nodes.len())?;
        check_count("leafs", header.num_leafs, leaves.len())?;
        check_count("overflow slots", header.num_overflow, overflow.len())?;

        let nodes = nodes
            .iter()
            .enumerate()
            .map(|(id, node)| node.unpack(id as u32))
            .collect::<Result<Vec<_>, _>>()?;
        let leaves = leaves
            .iter()
            .enumerate()
            .map(|(id, leaf)| leaf.unpack(id as u32))
            .collect::<Result<Vec<_>, _>>()?;
        let overflow = overflow
            .iter()
            .copied()
            .map(LeafTriangleSlot::from_packed)
            .collect();

        KdTree::new(
            Aabb::from_raw(header.bounds),
            vertices,
            uvs,
            indices,
            nodes,
            leaves,
            overflow,
        )
    }

    /// Packs the header of this tree in the offline builder's format.
    ///
    /// Every buffer must have at most `i32::MAX` elements.
    pub fn packed_header(&self) -> PackedKdTreeHeader {
        fn count(n: usize) -> i32 {
            debug_assert!(n <= i32::MAX as usize, "{n} elements do not fit a packed header.");
            n as i32
        }

        let header = &self.header;
        PackedKdTreeHeader {
            num_vertices: count(header.num_vertices),
            num_uvs: count(header.num_uvs),
            num_indices: count(header.num_indices),
            num_nodes: count(header.num_nodes),
            num_leafs: count(header.num_leaves),
            num_overflow: count(header.num_overflow),
            bounds: [header.bounds.mins.into(), header.bounds.maxs.into()],
        }
    }
}
