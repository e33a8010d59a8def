use crate::bounding_volume::{Aabb, BoxFace};
use crate::math::TWO_DIM;
use crate::partitioning::KdTreeError;

/// The number of triangle slots stored inline in a [`KdLeaf`].
///
/// Leaves with more triangles end their inline list with a
/// [`LeafTriangleSlot::OverflowPointer`].
pub const KD_TREE_MAX_LEAF_TRIANGLES: usize = 4;

/// An entry of a leaf triangle list, either inline in a [`KdLeaf`] or in the
/// overflow buffer of a [`KdTree`](crate::partitioning::KdTree).
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Default)]
pub enum LeafTriangleSlot {
    /// The index of a triangle, i.e., its corners are `indices[3 * i..3 * i + 3]`.
    Triangle(u32),
    /// The list continues in the overflow buffer, starting at this offset.
    OverflowPointer(u32),
    /// The list ends here.
    #[default]
    EndOfList,
}

/// The leaf record of a KD-tree.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct KdLeaf {
    /// The cell of space covered by this leaf.
    pub bounds: Aabb,
    /// The inline triangle list. Unused slots are [`LeafTriangleSlot::EndOfList`].
    pub triangles: [LeafTriangleSlot; KD_TREE_MAX_LEAF_TRIANGLES],
    /// For each face of `bounds`, in [`BoxFace`] order, the node a ray leaving
    /// the leaf through that face must resume from. `None` if the face lies on
    /// the boundary of the tree.
    pub ropes: [Option<u32>; TWO_DIM],
}

impl KdLeaf {
    /// Creates a leaf from its bounds, the beginning of its triangle list, and
    /// its ropes.
    ///
    /// Fails if `triangles` is longer than [`KD_TREE_MAX_LEAF_TRIANGLES`].
    pub fn new(
        bounds: Aabb,
        triangles: &[LeafTriangleSlot],
        ropes: [Option<u32>; TWO_DIM],
    ) -> Result<Self, KdTreeError> {
        if triangles.len() > KD_TREE_MAX_LEAF_TRIANGLES {
            return Err(KdTreeError::TooManyInlineSlots(triangles.len()));
        }

        let mut slots = [LeafTriangleSlot::EndOfList; KD_TREE_MAX_LEAF_TRIANGLES];
        slots[..triangles.len()].copy_from_slice(triangles);

        Ok(Self {
            bounds,
            triangles: slots,
            ropes,
        })
    }

    /// A leaf containing no triangle.
    pub fn empty(bounds: Aabb, ropes: [Option<u32>; TWO_DIM]) -> Self {
        Self {
            bounds,
            triangles: [LeafTriangleSlot::EndOfList; KD_TREE_MAX_LEAF_TRIANGLES],
            ropes,
        }
    }

    /// The node reached when leaving this leaf through `face`.
    #[inline]
    pub fn rope(&self, face: BoxFace) -> Option<u32> {
        self.ropes[face.index()]
    }
}
