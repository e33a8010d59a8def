use crate::math::Real;

/// The axis an interior KD-tree node splits its cell along.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
#[repr(u8)]
pub enum SplitAxis {
    /// Split along the `x` axis.
    X = 0,
    /// Split along the `y` axis.
    Y = 1,
    /// Split along the `z` axis.
    Z = 2,
}

impl SplitAxis {
    /// The coordinate index of this axis, in `0..3`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The axis with the given coordinate index, if it is smaller than 3.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(SplitAxis::X),
            1 => Some(SplitAxis::Y),
            2 => Some(SplitAxis::Z),
            _ => None,
        }
    }
}

/// A node of a KD-tree.
///
/// Nodes are stored in a flat array, the root being the first one. The two
/// children of an interior node are stored next to each other, so a single
/// offset addresses both of them.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum KdNode {
    /// A node splitting its cell in two with a plane orthogonal to `axis`.
    Interior {
        /// The axis the splitting plane is orthogonal to.
        axis: SplitAxis,
        /// The coordinate of the splitting plane along `axis`.
        split: Real,
        /// The index of the child covering the coordinates smaller than
        /// `split`. The child covering the larger coordinates is at
        /// `children + 1`.
        children: u32,
    },
    /// A node whose content is stored in a leaf record.
    Leaf {
        /// The index of the leaf record.
        leaf: u32,
    },
}

impl KdNode {
    /// Is this a leaf node?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, KdNode::Leaf { .. })
    }

    /// The leaf record index of this node, if it is a leaf.
    #[inline]
    pub fn leaf(&self) -> Option<u32> {
        match self {
            KdNode::Leaf { leaf } => Some(*leaf),
            KdNode::Interior { .. } => None,
        }
    }
}
