//! A naive KD-tree builder with ropes, used to produce test scenes.

use kdtrace3d::bounding_volume::{Aabb, BoxFace};
use kdtrace3d::math::{Point, Real, TexCoord, TWO_DIM};
use kdtrace3d::partitioning::{
    KdLeaf, KdNode, KdTree, LeafTriangleSlot, SplitAxis, KD_TREE_MAX_LEAF_TRIANGLES,
};

pub struct RopeTreeBuilder {
    pub max_depth: usize,
    pub max_leaf_triangles: usize,
}

impl Default for RopeTreeBuilder {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_leaf_triangles: KD_TREE_MAX_LEAF_TRIANGLES,
        }
    }
}

struct Buffers {
    triangle_aabbs: Vec<Aabb>,
    nodes: Vec<KdNode>,
    leaves: Vec<KdLeaf>,
    overflow: Vec<LeafTriangleSlot>,
}

impl RopeTreeBuilder {
    /// Builds a tree over `bounds` by splitting every cell at its center along
    /// its longest axis.
    ///
    /// Ropes point to the sibling subtree across the splitting plane, and are
    /// inherited from the parent on the other faces.
    pub fn build(
        &self,
        bounds: Aabb,
        vertices: Vec<Point<Real>>,
        uvs: Vec<TexCoord<Real>>,
        indices: Vec<u32>,
    ) -> KdTree {
        let triangle_aabbs = indices
            .chunks_exact(3)
            .map(|tri| Aabb::from_points(tri.iter().map(|i| vertices[*i as usize])))
            .collect();
        let mut buffers = Buffers {
            triangle_aabbs,
            nodes: vec![KdNode::Leaf { leaf: 0 }],
            leaves: vec![],
            overflow: vec![],
        };

        let triangles = (0..indices.len() as u32 / 3).collect();
        self.build_node(&mut buffers, 0, bounds, triangles, [None; TWO_DIM], 0);

        KdTree::new(
            bounds,
            vertices,
            uvs,
            indices,
            buffers.nodes,
            buffers.leaves,
            buffers.overflow,
        )
        .unwrap()
    }

    fn build_node(
        &self,
        buffers: &mut Buffers,
        id: u32,
        bounds: Aabb,
        triangles: Vec<u32>,
        ropes: [Option<u32>; TWO_DIM],
        depth: usize,
    ) {
        if triangles.len() <= self.max_leaf_triangles || depth >= self.max_depth {
            let leaf = buffers.leaves.len() as u32;
            let slots = Self::push_triangle_list(&mut buffers.overflow, &triangles);
            buffers
                .leaves
                .push(KdLeaf::new(bounds, &slots, ropes).unwrap());
            buffers.nodes[id as usize] = KdNode::Leaf { leaf };
            return;
        }

        let extents = bounds.extents();
        let axis = extents.imax();
        let split = bounds.center()[axis];
        let (left_bounds, right_bounds) = bounds.split_at(axis, split);

        let children = buffers.nodes.len() as u32;
        buffers.nodes.push(KdNode::Leaf { leaf: 0 });
        buffers.nodes.push(KdNode::Leaf { leaf: 0 });
        buffers.nodes[id as usize] = KdNode::Interior {
            axis: SplitAxis::from_index(axis).unwrap(),
            split,
            children,
        };

        let overlapping = |cell: &Aabb| -> Vec<u32> {
            triangles
                .iter()
                .copied()
                .filter(|t| buffers.triangle_aabbs[*t as usize].intersects(cell))
                .collect()
        };
        let left_triangles = overlapping(&left_bounds);
        let right_triangles = overlapping(&right_bounds);

        let mut left_ropes = ropes;
        left_ropes[BoxFace::new(axis, true).index()] = Some(children + 1);
        let mut right_ropes = ropes;
        right_ropes[BoxFace::new(axis, false).index()] = Some(children);

        self.build_node(
            buffers,
            children,
            left_bounds,
            left_triangles,
            left_ropes,
            depth + 1,
        );
        self.build_node(
            buffers,
            children + 1,
            right_bounds,
            right_triangles,
            right_ropes,
            depth + 1,
        );
    }

    /// The inline slots of a leaf listing `triangles`, moving the ones that
    /// don't fit to `overflow`.
    fn push_triangle_list(
        overflow: &mut Vec<LeafTriangleSlot>,
        triangles: &[u32],
    ) -> Vec<LeafTriangleSlot> {
        if triangles.len() <= KD_TREE_MAX_LEAF_TRIANGLES {
            return triangles
                .iter()
                .map(|t| LeafTriangleSlot::Triangle(*t))
                .collect();
        }

        let inline = KD_TREE_MAX_LEAF_TRIANGLES - 1;
        let mut slots: Vec<_> = triangles[..inline]
            .iter()
            .map(|t| LeafTriangleSlot::Triangle(*t))
            .collect();
        slots.push(LeafTriangleSlot::OverflowPointer(overflow.len() as u32));
        overflow.extend(
            triangles[inline..]
                .iter()
                .map(|t| LeafTriangleSlot::Triangle(*t)),
        );
        overflow.push(LeafTriangleSlot::EndOfList);
        slots
    }
}

/// Random small triangles inside `[-1, 1]³`, with texture coordinates.
pub fn random_triangle_soup(
    rng: &mut oorandom::Rand32,
    num_triangles: usize,
) -> (Vec<Point<Real>>, Vec<TexCoord<Real>>, Vec<u32>) {
    let mut vertices = vec![];
    let mut uvs = vec![];

    for _ in 0..num_triangles {
        let center = Point::new(
            rng.rand_float() * 1.6 - 0.8,
            rng.rand_float() * 1.6 - 0.8,
            rng.rand_float() * 1.6 - 0.8,
        );
        for _ in 0..3 {
            vertices.push(Point::new(
                center.x + rng.rand_float() * 0.4 - 0.2,
                center.y + rng.rand_float() * 0.4 - 0.2,
                center.z + rng.rand_float() * 0.4 - 0.2,
            ));
            uvs.push(TexCoord::new(rng.rand_float(), rng.rand_float()));
        }
    }

    let indices = (0..vertices.len() as u32).collect();
    (vertices, uvs, indices)
}

pub fn unit_cube() -> Aabb {
    Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0))
}

pub fn random_point_in_cube(rng: &mut oorandom::Rand32, half_extent: Real) -> Point<Real> {
    Point::new(
        (rng.rand_float() * 2.0 - 1.0) * half_extent,
        (rng.rand_float() * 2.0 - 1.0) * half_extent,
        (rng.rand_float() * 2.0 - 1.0) * half_extent,
    )
}
