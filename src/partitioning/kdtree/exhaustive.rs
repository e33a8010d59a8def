use super::{KdTree, TraceResult};
use crate::math::{Point, Real};
use crate::query::{local_ray_intersection_with_triangle, SegmentRay};

impl KdTree {
    /// Computes the closest front-facing triangle hit by the segment
    /// `[start, end]` by testing every triangle of the mesh.
    ///
    /// The tree structure is ignored. This is much slower than
    /// [`KdTree::trace`] but gives the same result (up to the order of
    /// equidistant triangles), which makes it a reference for validating a
    /// tree.
    pub fn trace_exhaustive(&self, start: &Point<Real>, end: &Point<Real>) -> TraceResult {
        let Some(seg) = SegmentRay::from_segment(start, end) else {
            return TraceResult::no_hit();
        };

        let mut best_distance = seg.length;
        let mut best = None;

        for triangle in 0..self.num_triangles() as u32 {
            let [a, b, c] = self.triangle_vertices(triangle);

            if let Some(hit) = local_ray_intersection_with_triangle(&a, &b, &c, &seg.ray) {
                if hit.time_of_impact >= 0.0 && hit.time_of_impact < best_distance {
                    best_distance = hit.time_of_impact;
                    best = Some((triangle, hit));
                }
            }
        }

        self.make_result(&seg, best)
    }
}
