use crate::math::{Point, Real, Vector};
use crate::query::Ray;
use crate::utils::TRIANGLE_DETERMINANT_EPSILON;

/// The intersection between a ray and a triangle, as computed by
/// [`local_ray_intersection_with_triangle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// The time of impact: the hit point is `ray.point_at(time_of_impact)`.
    ///
    /// This may be negative if the triangle plane is crossed behind the ray
    /// origin.
    pub time_of_impact: Real,
    /// The barycentric coordinate of the hit point relative to the second vertex.
    pub u: Real,
    /// The barycentric coordinate of the hit point relative to the third vertex.
    pub v: Real,
}

impl TriangleHit {
    /// The three barycentric coordinates `(1 - u - v, u, v)` of the hit point.
    #[inline]
    pub fn barycentric_coordinates(&self) -> Vector<Real> {
        Vector::new(1.0 - self.u - self.v, self.u, self.v)
    }
}

/// Computes the intersection between a ray and the triangle `(a, b, c)`.
///
/// This implements "Fast, Minimum Storage Ray/Triangle Intersection", Möller,
/// Trumbore, Journal of Graphics Tools 1997.
///
/// The triangle is back-face culled: it is only hit by rays travelling against
/// its normal `(b - a) × (c - a)`, i.e., rays that see its vertices in
/// counter-clockwise order. Rays (nearly) parallel to the triangle plane miss.
///
/// The hit point is `(1 - u - v) * a + u * b + v * c`. No bound is applied to
/// the time of impact: callers decide which range of the ray they accept.
///
/// ```rust
/// use kdtrace3d::query::{local_ray_intersection_with_triangle, Ray};
/// use nalgebra::{Point3, Vector3};
///
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(1.0, 0.0, 0.0);
/// let c = Point3::new(0.0, 1.0, 0.0);
///
/// let front = Ray::new(Point3::new(0.2, 0.2, 1.0), -Vector3::z());
/// let hit = local_ray_intersection_with_triangle(&a, &b, &c, &front).unwrap();
/// assert!((hit.time_of_impact - 1.0).abs() < 1.0e-6);
///
/// let back = Ray::new(Point3::new(0.2, 0.2, -1.0), Vector3::z());
/// assert!(local_ray_intersection_with_triangle(&a, &b, &c, &back).is_none());
/// ```
#[inline]
pub fn local_ray_intersection_with_triangle(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    ray: &Ray,
) -> Option<TriangleHit> {
    let ab = b - a;
    let ac = c - a;

    let p = ray.dir.cross(&ac);
    let det = ab.dot(&p);

    // Back-facing, or parallel to the triangle plane.
    if det <= TRIANGLE_DETERMINANT_EPSILON {
        return None;
    }

    let ap = ray.origin - a;
    let u = ap.dot(&p);

    if u < 0.0 || u > det {
        return None;
    }

    let q = ap.cross(&ab);
    let v = ray.dir.dot(&q);

    if v < 0.0 || u + v > det {
        return None;
    }

    let inv_det = 1.0 / det;

    Some(TriangleHit {
        time_of_impact: ac.dot(&q) * inv_det,
        u: u * inv_det,
        v: v * inv_det,
    })
}
