use crate::bounding_volume::{Aabb, BoxFace};
use crate::math::{Point, Real, Vector};
use crate::utils;

/// The distances along a ray to the six planes bounding an [`Aabb`].
///
/// This is the slab test from "An Efficient and Robust Ray–Box Intersection
/// Algorithm", Williams, Barrus, Morley, Shirley, Journal of Graphics Tools
/// 2005, with the per-axis results kept around so the exit face can be
/// identified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySlabs {
    /// `(aabb.mins - origin) * inv_dir`.
    pub to_mins: Vector<Real>,
    /// `(aabb.maxs - origin) * inv_dir`.
    pub to_maxs: Vector<Real>,
}

impl RaySlabs {
    /// Computes the slab distances of `aabb` along the ray starting at
    /// `origin` with the reciprocal direction `inv_dir`.
    ///
    /// `inv_dir` is expected to come from [`utils::inv_dir`] so it contains no
    /// infinities.
    #[inline]
    pub fn new(origin: &Point<Real>, inv_dir: &Vector<Real>, aabb: &Aabb) -> Self {
        Self {
            to_mins: (aabb.mins - origin).component_mul(inv_dir),
            to_maxs: (aabb.maxs - origin).component_mul(inv_dir),
        }
    }

    /// The distance along the ray where it enters the box.
    #[inline]
    pub fn entry(&self) -> Real {
        let mins = self.to_mins.inf(&self.to_maxs);
        mins.x.max(mins.y.max(mins.z))
    }

    /// The distance along the ray where it leaves the box.
    #[inline]
    pub fn exit(&self) -> Real {
        let maxs = self.to_mins.sup(&self.to_maxs);
        maxs.x.min(maxs.y.min(maxs.z))
    }

    /// The `(entry, exit)` distances, if the ray line crosses the box.
    ///
    /// A ray touching the box on a single point or running exactly along one
    /// of its faces is considered a miss.
    #[inline]
    pub fn interval(&self) -> Option<(Real, Real)> {
        let t0 = self.entry();
        let t1 = self.exit();

        if t0 < t1 {
            Some((t0, t1))
        } else {
            None
        }
    }

    /// The face the ray leaves the box through.
    ///
    /// The exit axis is the one with the smallest exit distance; on ties the
    /// later axis wins. The side is `+` if the ray travels toward `maxs` along
    /// that axis.
    #[inline]
    pub fn exit_face(&self) -> BoxFace {
        let maxs = self.to_mins.sup(&self.to_maxs);
        let axis = if maxs.x < maxs.y {
            if maxs.x < maxs.z {
                0
            } else {
                2
            }
        } else if maxs.y < maxs.z {
            1
        } else {
            2
        };

        BoxFace::new(axis, self.to_mins[axis] < self.to_maxs[axis])
    }
}

/// Computes the parametric interval where a ray crosses the box `[mins, maxs]`.
///
/// Returns `Some((t0, t1))` with `t0 < t1` if the ray line crosses the box,
/// where `ray_start + t0 * ray_dir` is the entry point and
/// `ray_start + t1 * ray_dir` the exit point. Either distance may be negative
/// if the box lies (partly) behind `ray_start`.
///
/// Direction components that are too small to be inverted are handled with
/// [`utils::inv_or_huge`], so rays parallel to an axis never produce NaN.
///
/// ```rust
/// use kdtrace3d::query::intersect_ray_aabb;
/// use nalgebra::{Point3, Vector3};
///
/// let (t0, t1) = intersect_ray_aabb(
///     &Point3::new(0.5, -2.0, 0.5),
///     &Vector3::y(),
///     &Point3::origin(),
///     &Point3::new(1.0, 1.0, 1.0),
/// )
/// .unwrap();
/// assert_eq!((t0, t1), (2.0, 3.0));
/// ```
pub fn intersect_ray_aabb(
    ray_start: &Point<Real>,
    ray_dir: &Vector<Real>,
    mins: &Point<Real>,
    maxs: &Point<Real>,
) -> Option<(Real, Real)> {
    let inv_dir = utils::inv_dir(ray_dir);
    RaySlabs::new(ray_start, &inv_dir, &Aabb::new(*mins, *maxs)).interval()
}
