use crate::math::Real;

/// The smallest positive normal value; direction components at or below
/// this magnitude are considered zero.
pub const SMALLEST_NON_DENORMAL: Real = Real::MIN_POSITIVE;

/// The reciprocal substituted for direction components considered zero.
pub const HUGE_NUMBER: Real = 1.844_674_3e19;

/// Slack added to the root-box exit distance so that triangles lying exactly
/// on the root boundary are not lost to rounding.
pub const BOUNDARY_EPSILON: Real = 1.0e-5;

/// Half-width of the band around a split plane where the ray direction,
/// rather than the entry point, selects the child.
pub const SPLIT_PLANE_EPSILON: Real = 1.0e-5;

/// Determinants at or below this value are treated as back-facing or
/// parallel by the ray/triangle test.
pub const TRIANGLE_DETERMINANT_EPSILON: Real = 1.0e-6;
