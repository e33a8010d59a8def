//! Stackless traversal, after "Stackless KD-Tree Traversal for High
//! Performance GPU Ray Tracing", Popov, Günther, Seidel, Slusallek,
//! Eurographics 2007.

use super::{KdNode, KdTree, TraceOptions, TraceResult, TraceStats};
use crate::math::{Point, Real, TexCoord, Vector};
use crate::query::{local_ray_intersection_with_triangle, RaySlabs, SegmentRay, TriangleHit};
use crate::utils::{BOUNDARY_EPSILON, SPLIT_PLANE_EPSILON};
use alloc::vec::Vec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

impl KdTree {
    /// Computes the closest front-facing triangle hit by the segment
    /// `[start, end]`.
    ///
    /// This walks the leaves crossed by the segment in order, following the
    /// ropes between them, and stops as soon as no closer hit can exist. At
    /// most [`KD_TREE_MAX_ITERATIONS`](super::KD_TREE_MAX_ITERATIONS) leaves
    /// are visited.
    ///
    /// Triangles are back-face culled: only the triangles whose normal
    /// `(b - a) × (c - a)` points against the segment direction can be hit.
    pub fn trace(&self, start: &Point<Real>, end: &Point<Real>) -> TraceResult {
        self.trace_with_stats(start, end, &TraceOptions::default()).0
    }

    /// Computes the closest front-facing triangle hit by the segment
    /// `[start, end]`, and reports statistics about the traversal.
    ///
    /// If [`TraceStats::iteration_limit_reached`] is set, the traversal was
    /// cut short and the result is the best hit among the leaves visited.
    pub fn trace_with_stats(
        &self,
        start: &Point<Real>,
        end: &Point<Real>,
        options: &TraceOptions,
    ) -> (TraceResult, TraceStats) {
        let mut stats = TraceStats::default();

        let Some(seg) = SegmentRay::from_segment(start, end) else {
            return (TraceResult::no_hit(), stats);
        };

        let Some((t0, t1)) = RaySlabs::new(&seg.ray.origin, &seg.inv_dir, &self.header.bounds)
            .interval()
        else {
            return (TraceResult::no_hit(), stats);
        };

        // The root box lies entirely behind the start.
        if t1 < 0.0 {
            return (TraceResult::no_hit(), stats);
        }

        let mut entry_distance = t0.max(0.0);
        let mut best_distance = (t1 + BOUNDARY_EPSILON).min(seg.length);
        let mut best = None;
        let mut curr_node = 0;
        let mut terminated = false;

        for _ in 0..options.max_iterations {
            stats.iterations += 1;

            let entry_point = seg.ray.point_at(entry_distance);
            let leaf_id = self.descend(curr_node, &entry_point, &seg.ray.dir, &mut stats);
            let leaf = &self.leaves[leaf_id as usize];

            for triangle in super::LeafTriangles::new(leaf, &self.overflow) {
                stats.triangle_tests += 1;
                let [a, b, c] = self.triangle_vertices(triangle);

                if let Some(hit) = local_ray_intersection_with_triangle(&a, &b, &c, &seg.ray) {
                    if hit.time_of_impact >= 0.0 && hit.time_of_impact < best_distance {
                        best_distance = hit.time_of_impact;
                        best = Some((triangle, hit));
                    }
                }
            }

            // Where the ray enters the next leaf.
            let slabs = RaySlabs::new(&seg.ray.origin, &seg.inv_dir, &leaf.bounds);
            let exit_distance = slabs.exit();

            if exit_distance >= best_distance {
                terminated = true;
                break;
            }

            match leaf.rope(slabs.exit_face()) {
                Some(next) => {
                    curr_node = next;
                    entry_distance = exit_distance;
                }
                None => {
                    terminated = true;
                    break;
                }
            }
        }

        if !terminated {
            stats.iteration_limit_reached = true;
            log::debug!(
                "KD-tree traversal stopped after {} iterations; the tree may contain a rope cycle.",
                options.max_iterations
            );
        }

        (self.make_result(&seg, best), stats)
    }

    /// Traces each `(start, end)` segment with [`KdTree::trace`].
    ///
    /// With the `parallel` feature, the segments are traced in parallel.
    /// Results are in the same order as `segments`.
    pub fn trace_many(&self, segments: &[(Point<Real>, Point<Real>)]) -> Vec<TraceResult> {
        #[cfg(feature = "parallel")]
        {
            segments
                .par_iter()
                .map(|(start, end)| self.trace(start, end))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            segments
                .iter()
                .map(|(start, end)| self.trace(start, end))
                .collect()
        }
    }

    /// Steps down from `node` to the leaf containing `entry_point`.
    ///
    /// An entry point within [`SPLIT_PLANE_EPSILON`] of a splitting plane
    /// goes to the side the ray is heading to.
    #[inline]
    fn descend(
        &self,
        mut node: u32,
        entry_point: &Point<Real>,
        dir: &Vector<Real>,
        stats: &mut TraceStats,
    ) -> u32 {
        loop {
            match self.nodes[node as usize] {
                KdNode::Leaf { leaf } => return leaf,
                KdNode::Interior {
                    axis,
                    split,
                    children,
                } => {
                    stats.interior_steps += 1;
                    let i = axis.index();
                    let delta = entry_point[i] - split;
                    let far = if delta < -SPLIT_PLANE_EPSILON {
                        false
                    } else if delta > SPLIT_PLANE_EPSILON {
                        true
                    } else {
                        dir[i] > 0.0
                    };

                    node = children + far as u32;
                }
            }
        }
    }

    /// The vertices of a triangle known to exist.
    #[inline]
    pub(super) fn triangle_vertices(&self, triangle: u32) -> [Point<Real>; 3] {
        let first = triangle as usize * 3;
        [
            self.vertices[self.indices[first] as usize],
            self.vertices[self.indices[first + 1] as usize],
            self.vertices[self.indices[first + 2] as usize],
        ]
    }

    pub(super) fn make_result(
        &self,
        seg: &SegmentRay,
        best: Option<(u32, TriangleHit)>,
    ) -> TraceResult {
        let Some((triangle, hit)) = best else {
            return TraceResult::no_hit();
        };

        let first = triangle as usize * 3;
        let ids = [
            self.indices[first] as usize,
            self.indices[first + 1] as usize,
            self.indices[first + 2] as usize,
        ];

        let uv = if self.uvs.is_empty() {
            TexCoord::origin()
        } else {
            let bcoords = hit.barycentric_coordinates();
            TexCoord::from(
                self.uvs[ids[0]].coords * bcoords.x
                    + self.uvs[ids[1]].coords * bcoords.y
                    + self.uvs[ids[2]].coords * bcoords.z,
            )
        };

        let a = self.vertices[ids[0]];
        let ab = self.vertices[ids[1]] - a;
        let ac = self.vertices[ids[2]] - a;

        TraceResult {
            triangle: Some(triangle),
            fraction: seg.fraction(hit.time_of_impact),
            uv,
            // Can't be zero: degenerate triangles are never hit.
            normal: ab.cross(&ac).normalize(),
        }
    }
}
