use crate::common::{random_triangle_soup, unit_cube, RopeTreeBuilder};
use kdtrace3d::math::{Point, Real};
use kdtrace3d::partitioning::KdTree;
use rand::{Rng, SeedableRng};
use rand_isaac::IsaacRng;
use test::Bencher;

const NUM_SEGMENTS: usize = 1024;

fn scene(num_triangles: usize) -> KdTree {
    let mut rng = oorandom::Rand32::new(42);
    let (vertices, uvs, indices) = random_triangle_soup(&mut rng, num_triangles);
    RopeTreeBuilder::default().build(unit_cube(), vertices, uvs, indices)
}

fn random_point<R: Rng>(rng: &mut R) -> Point<Real> {
    Point::new(
        rng.gen_range(-1.5..1.5),
        rng.gen_range(-1.5..1.5),
        rng.gen_range(-1.5..1.5),
    )
}

fn segments() -> Vec<(Point<Real>, Point<Real>)> {
    let mut rng = IsaacRng::seed_from_u64(0);
    (0..NUM_SEGMENTS)
        .map(|_| (random_point(&mut rng), random_point(&mut rng)))
        .collect()
}

#[bench]
fn bench_trace(bh: &mut Bencher) {
    let tree = scene(2000);
    let segments = segments();
    let mut i = 0;

    bh.iter(|| {
        let (start, end) = &segments[i];
        i = (i + 1) % segments.len();
        test::black_box(tree.trace(start, end))
    })
}

#[bench]
fn bench_trace_exhaustive(bh: &mut Bencher) {
    let tree = scene(2000);
    let segments = segments();
    let mut i = 0;

    bh.iter(|| {
        let (start, end) = &segments[i];
        i = (i + 1) % segments.len();
        test::black_box(tree.trace_exhaustive(start, end))
    })
}

#[bench]
fn bench_trace_many(bh: &mut Bencher) {
    let tree = scene(2000);
    let segments = segments();

    bh.iter(|| test::black_box(tree.trace_many(&segments)))
}
