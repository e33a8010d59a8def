use crate::math::{Point, Real, TexCoord, Vector};
use approx::{AbsDiffEq, RelativeEq};

/// The maximum number of leaves a single [`KdTree::trace`](super::KdTree::trace) visits.
pub const KD_TREE_MAX_ITERATIONS: usize = 128;

/// The closest intersection between a segment and the triangles of a KD-tree.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct TraceResult {
    /// The index of the triangle hit, or `None` if the segment hits nothing.
    ///
    /// The corners of the triangle are `indices[3 * i..3 * i + 3]`.
    pub triangle: Option<u32>,
    /// Where the hit lies along the segment: `0.0` at its start, `1.0` at
    /// its end. Equal to `1.0` if nothing is hit.
    pub fraction: Real,
    /// The texture coordinate at the hit point, interpolated from the
    /// texture coordinates of the triangle corners. Zero if nothing is hit or
    /// the mesh has no texture coordinates.
    pub uv: TexCoord<Real>,
    /// The unit normal of the triangle hit, or zero if nothing is hit.
    ///
    /// This is the flat normal `(b - a) × (c - a)` of the triangle, not an
    /// interpolation of vertex normals.
    pub normal: Vector<Real>,
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::no_hit()
    }
}

impl TraceResult {
    /// The result of a segment hitting nothing.
    #[inline]
    pub fn no_hit() -> Self {
        Self {
            triangle: None,
            fraction: 1.0,
            uv: TexCoord::origin(),
            normal: Vector::zeros(),
        }
    }

    /// Did the segment hit a triangle?
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.triangle.is_some()
    }

    /// The position, in the index buffer, of the first corner of the
    /// triangle hit.
    #[inline]
    pub fn first_index(&self) -> Option<usize> {
        self.triangle.map(|t| t as usize * 3)
    }

    /// The hit point on the segment `[start, end]` this result was computed for.
    ///
    /// This is `end` if nothing was hit.
    #[inline]
    pub fn point_on_segment(&self, start: &Point<Real>, end: &Point<Real>) -> Point<Real> {
        start + (end - start) * self.fraction
    }
}

impl AbsDiffEq for TraceResult {
    type Epsilon = Real;

    fn default_epsilon() -> Real {
        Real::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Real) -> bool {
        self.triangle == other.triangle
            && self.fraction.abs_diff_eq(&other.fraction, epsilon)
            && self.uv.abs_diff_eq(&other.uv, epsilon)
            && self.normal.abs_diff_eq(&other.normal, epsilon)
    }
}

impl RelativeEq for TraceResult {
    fn default_max_relative() -> Real {
        Real::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Real, max_relative: Real) -> bool {
        self.triangle == other.triangle
            && self
                .fraction
                .relative_eq(&other.fraction, epsilon, max_relative)
            && self.uv.relative_eq(&other.uv, epsilon, max_relative)
            && self.normal.relative_eq(&other.normal, epsilon, max_relative)
    }
}

/// Tuning knobs of [`KdTree::trace_with_stats`](super::KdTree::trace_with_stats).
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct TraceOptions {
    /// The maximum number of leaves visited before the traversal gives up and
    /// returns the best hit found so far.
    ///
    /// This only matters for malformed trees (e.g. with rope cycles) or
    /// extremely long segments crossing more leaves than this.
    pub max_iterations: usize,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            max_iterations: KD_TREE_MAX_ITERATIONS,
        }
    }
}

/// Counters collected while tracing a single segment.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub struct TraceStats {
    /// The number of traversal iterations, i.e., of leaves entered.
    pub iterations: usize,
    /// The number of interior nodes stepped through while descending to leaves.
    pub interior_steps: usize,
    /// The number of ray/triangle tests performed.
    pub triangle_tests: usize,
    /// Did the traversal stop because it reached
    /// [`TraceOptions::max_iterations`]? If so, the result may miss the
    /// actual closest hit.
    pub iteration_limit_reached: bool,
}
