use crate::common::{random_point_in_cube, random_triangle_soup, unit_cube, RopeTreeBuilder};
use approx::assert_relative_eq;
use kdtrace3d::math::{Point, Real, Vector};
use kdtrace3d::partitioning::{KdTree, TraceOptions};

fn random_tree(seed: u64, num_triangles: usize, builder: &RopeTreeBuilder) -> KdTree {
    let mut rng = oorandom::Rand32::new(seed);
    let (vertices, uvs, indices) = random_triangle_soup(&mut rng, num_triangles);
    builder.build(unit_cube(), vertices, uvs, indices)
}

/// Checks that the traversal finds the same hit as the brute-force scan.
///
/// Returns `true` if the segment hit something.
fn check_segment(tree: &KdTree, start: &Point<Real>, end: &Point<Real>) -> bool {
    let (fast, stats) = tree.trace_with_stats(start, end, &TraceOptions::default());
    let slow = tree.trace_exhaustive(start, end);

    assert!(
        !stats.iteration_limit_reached,
        "Traversal of {start:?} -> {end:?} did not terminate: {stats:?}"
    );

    if fast.triangle == slow.triangle {
        assert_relative_eq!(fast, slow, epsilon = 1.0e-5);
    } else {
        // Two triangles at the same distance.
        assert!(
            (fast.fraction - slow.fraction).abs() < 1.0e-4,
            "Segment {start:?} -> {end:?}: traversal found {fast:?}, brute force found {slow:?}"
        );
    }

    slow.is_hit()
}

#[test]
fn random_segments_match_exhaustive_trace() {
    let tree = random_tree(42, 300, &RopeTreeBuilder::default());
    let mut rng = oorandom::Rand32::new(7);
    let mut num_hits = 0;

    for _ in 0..2000 {
        let start = random_point_in_cube(&mut rng, 1.5);
        let end = random_point_in_cube(&mut rng, 1.5);
        num_hits += check_segment(&tree, &start, &end) as usize;
    }

    assert!(num_hits > 100, "Only {num_hits} segments hit the scene.");
}

#[test]
fn short_segments_inside_the_scene() {
    let tree = random_tree(3, 300, &RopeTreeBuilder::default());
    let mut rng = oorandom::Rand32::new(11);

    for _ in 0..2000 {
        let start = random_point_in_cube(&mut rng, 1.0);
        let end = start + random_point_in_cube(&mut rng, 0.2).coords;
        check_segment(&tree, &start, &end);
    }
}

#[test]
fn axis_aligned_segments_match_exhaustive_trace() {
    let tree = random_tree(1234, 300, &RopeTreeBuilder::default());
    let mut rng = oorandom::Rand32::new(5);
    let mut num_hits = 0;

    for i in 0..1500 {
        let axis = i % 3;
        let sign = if (i / 3) % 2 == 0 { 1.0 } else { -1.0 };
        let start = random_point_in_cube(&mut rng, 0.95);
        let mut dir = Vector::zeros();
        dir[axis] = sign * 3.0;

        let mut start = start;
        start[axis] = -sign * 1.5;
        let end = start + dir;

        num_hits += check_segment(&tree, &start, &end) as usize;
    }

    assert!(num_hits > 100, "Only {num_hits} segments hit the scene.");
}

#[test]
fn crowded_leaves_match_exhaustive_trace() {
    let builder = RopeTreeBuilder {
        max_depth: 3,
        max_leaf_triangles: 64,
    };
    let tree = random_tree(99, 200, &builder);
    assert!(!tree.overflow().is_empty());

    let mut rng = oorandom::Rand32::new(8);
    for _ in 0..1000 {
        let start = random_point_in_cube(&mut rng, 1.5);
        let end = random_point_in_cube(&mut rng, 1.5);
        check_segment(&tree, &start, &end);
    }
}

#[test]
fn leaf_triangle_lists_cover_the_mesh() {
    let builder = RopeTreeBuilder {
        max_depth: 4,
        max_leaf_triangles: 16,
    };
    let tree = random_tree(17, 150, &builder);
    let mut listed = vec![false; tree.num_triangles()];

    for leaf in 0..tree.leaves().len() as u32 {
        for triangle in tree.leaf_triangles(leaf).unwrap() {
            listed[triangle as usize] = true;
        }
    }

    assert!(listed.iter().all(|l| *l));
}

#[test]
fn traced_hit_lies_on_the_triangle() {
    let tree = random_tree(2024, 300, &RopeTreeBuilder::default());
    let mut rng = oorandom::Rand32::new(13);

    for _ in 0..500 {
        let start = random_point_in_cube(&mut rng, 1.5);
        let end = random_point_in_cube(&mut rng, 1.5);
        let result = tree.trace(&start, &end);

        let Some(triangle) = result.triangle else {
            assert_eq!(result.fraction, 1.0);
            continue;
        };

        assert!((0.0..=1.0).contains(&result.fraction));
        assert_relative_eq!(result.normal.norm(), 1.0, epsilon = 1.0e-5);
        // Front faces only.
        assert!(result.normal.dot(&(end - start)) < 0.0);

        let [a, _, _] = tree.triangle(triangle).unwrap();
        let point = result.point_on_segment(&start, &end);
        assert!((point - a).dot(&result.normal).abs() < 1.0e-4);
        assert!(result.uv.coords.iter().all(|x| (-1.0e-4..=1.0 + 1.0e-4).contains(x)));
    }
}
