use crate::common::{random_point_in_cube, random_triangle_soup, unit_cube, RopeTreeBuilder};
use kdtrace3d::partitioning::{
    KdTree, KdTreeError, LeafTriangleSlot, PackedKdLeaf, PackedKdNode,
};

struct PackedBuffers {
    nodes: Vec<PackedKdNode>,
    leaves: Vec<PackedKdLeaf>,
    overflow: Vec<i32>,
}

fn pack(tree: &KdTree) -> PackedBuffers {
    PackedBuffers {
        nodes: tree.nodes().iter().map(PackedKdNode::pack).collect(),
        leaves: tree.leaves().iter().map(PackedKdLeaf::pack).collect(),
        overflow: tree
            .overflow()
            .iter()
            .map(|slot| slot.to_packed())
            .collect(),
    }
}

fn builder() -> RopeTreeBuilder {
    RopeTreeBuilder {
        max_depth: 5,
        max_leaf_triangles: 8,
    }
}

#[test]
fn unpacked_tree_traces_like_the_packed_one() {
    let mut rng = oorandom::Rand32::new(42);
    let (vertices, uvs, indices) = random_triangle_soup(&mut rng, 100);
    let tree = builder().build(unit_cube(), vertices, uvs, indices);
    let packed = pack(&tree);

    let header = tree.packed_header();
    assert_eq!(header.num_nodes as usize, tree.nodes().len());
    assert_eq!(header.num_leafs as usize, tree.leaves().len());
    assert_eq!(header.bounds, [[-1.0; 3], [1.0; 3]]);

    let unpacked = KdTree::from_packed(
        &header,
        tree.vertices().to_vec(),
        tree.uvs().to_vec(),
        tree.indices().to_vec(),
        &packed.nodes,
        &packed.leaves,
        &packed.overflow,
    )
    .unwrap();

    assert_eq!(unpacked.nodes(), tree.nodes());
    assert_eq!(unpacked.leaves(), tree.leaves());
    assert_eq!(unpacked.overflow(), tree.overflow());

    for _ in 0..500 {
        let start = random_point_in_cube(&mut rng, 1.5);
        let end = random_point_in_cube(&mut rng, 1.5);
        assert_eq!(unpacked.trace(&start, &end), tree.trace(&start, &end));
    }
}

#[test]
fn overflow_markers_are_decoded() {
    let packed = [5, -1, (0x8000_0000u32 | 3) as i32, 0];
    let slots: Vec<_> = packed
        .iter()
        .copied()
        .map(LeafTriangleSlot::from_packed)
        .collect();

    assert_eq!(
        slots,
        vec![
            LeafTriangleSlot::Triangle(5),
            LeafTriangleSlot::EndOfList,
            LeafTriangleSlot::OverflowPointer(3),
            LeafTriangleSlot::Triangle(0),
        ]
    );
    let repacked: Vec<_> = slots.iter().map(|s| s.to_packed()).collect();
    assert_eq!(repacked, packed);
}

#[test]
fn packed_header_must_match_buffers() {
    let mut rng = oorandom::Rand32::new(1);
    let (vertices, uvs, indices) = random_triangle_soup(&mut rng, 20);
    let tree = builder().build(unit_cube(), vertices, uvs, indices);
    let packed = pack(&tree);

    let mut header = tree.packed_header();
    header.num_nodes += 1;

    let err = KdTree::from_packed(
        &header,
        tree.vertices().to_vec(),
        tree.uvs().to_vec(),
        tree.indices().to_vec(),
        &packed.nodes,
        &packed.leaves,
        &packed.overflow,
    )
    .unwrap_err();

    assert_eq!(
        err,
        KdTreeError::HeaderCountMismatch {
            buffer: "nodes",
            declared: header.num_nodes,
            actual: tree.nodes().len(),
        }
    );
}

#[test]
fn corrupted_packed_records_are_rejected() {
    let mut rng = oorandom::Rand32::new(2);
    let (vertices, uvs, indices) = random_triangle_soup(&mut rng, 20);
    let tree = builder().build(unit_cube(), vertices, uvs, indices);
    let header = tree.packed_header();

    // Axis 3 does not exist.
    let mut packed = pack(&tree);
    packed.nodes[0].data |= 0b110;
    let err = KdTree::from_packed(
        &header,
        tree.vertices().to_vec(),
        tree.uvs().to_vec(),
        tree.indices().to_vec(),
        &packed.nodes,
        &packed.leaves,
        &packed.overflow,
    )
    .unwrap_err();
    assert_eq!(err, KdTreeError::InvalidSplitAxis(0));

    // Ropes are either -1 or a node index.
    let mut packed = pack(&tree);
    packed.leaves[1].ropes[2] = -7;
    let err = KdTree::from_packed(
        &header,
        tree.vertices().to_vec(),
        tree.uvs().to_vec(),
        tree.indices().to_vec(),
        &packed.nodes,
        &packed.leaves,
        &packed.overflow,
    )
    .unwrap_err();
    assert_eq!(err, KdTreeError::InvalidPackedRope { leaf: 1, value: -7 });
}

#[cfg(feature = "bytemuck-serialize")]
#[test]
fn packed_records_are_plain_old_data() {
    let mut rng = oorandom::Rand32::new(3);
    let (vertices, uvs, indices) = random_triangle_soup(&mut rng, 20);
    let tree = builder().build(unit_cube(), vertices, uvs, indices);
    let packed = pack(&tree);

    let bytes: &[u8] = bytemuck::cast_slice(&packed.leaves);
    assert_eq!(bytes.len(), packed.leaves.len() * 64);
    let leaves: &[PackedKdLeaf] = bytemuck::cast_slice(bytes);
    assert_eq!(leaves, &packed.leaves[..]);

    let bytes: &[u8] = bytemuck::cast_slice(&packed.nodes);
    let nodes: &[PackedKdNode] = bytemuck::cast_slice(bytes);
    assert_eq!(nodes, &packed.nodes[..]);
}
