//! Structures needed to cast rays.

use crate::math::{Point, Real, Vector};
use crate::utils::{self, SMALLEST_NON_DENORMAL};

/// A ray for ray-casting queries.
///
/// A ray is a half-infinite line starting at an origin point and extending
/// infinitely in a direction. Points along the ray are `origin + dir * t`.
///
/// The intersection routines of this crate do not require `dir` to be
/// normalized, but the time of impact they return is expressed in multiples
/// of `dir.norm()`.
///
/// ```rust
/// use kdtrace3d::query::Ray;
/// use nalgebra::{Point3, Vector3};
///
/// let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
/// assert_eq!(ray.point_at(5.0), Point3::new(5.0, 0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray starting from `origin` and with the direction `dir`.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// Computes the point `origin + dir * t`.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }
}

/// A segment converted into a unit-direction ray, with everything a KD-tree
/// traversal needs precomputed.
///
/// Distances along [`SegmentRay::ray`] are world-space distances from the
/// segment start; the segment end lies at [`SegmentRay::length`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRay {
    /// The ray starting at the segment start, with a normalized direction.
    pub ray: Ray,
    /// The guarded reciprocal of `ray.dir` (see [`utils::inv_or_huge`]).
    pub inv_dir: Vector<Real>,
    /// The length of the segment.
    pub length: Real,
}

impl SegmentRay {
    /// Builds the ray going from `start` to `end`.
    ///
    /// Returns `None` if the segment is too short to have a direction.
    pub fn from_segment(start: &Point<Real>, end: &Point<Real>) -> Option<Self> {
        let delta = end - start;
        let length = delta.norm();

        if length.is_nan() || length <= SMALLEST_NON_DENORMAL {
            return None;
        }

        let dir = delta / length;
        Some(Self {
            ray: Ray::new(*start, dir),
            inv_dir: utils::inv_dir(&dir),
            length,
        })
    }

    /// Converts a distance along this ray into a fraction of the segment.
    #[inline]
    pub fn fraction(&self, distance: Real) -> Real {
        distance / self.length
    }
}
