use crate::math::{Real, Vector};
use crate::utils::{HUGE_NUMBER, SMALLEST_NON_DENORMAL};

/// The reciprocal of `val`, or [`HUGE_NUMBER`] if `|val|` is too small to be
/// inverted without producing infinities.
///
/// Rays running parallel to an axis get large finite slab distances, never
/// `inf` or `NaN`.
#[inline]
pub fn inv_or_huge(val: Real) -> Real {
    if val.abs() > SMALLEST_NON_DENORMAL {
        1.0 / val
    } else {
        HUGE_NUMBER
    }
}

/// Component-wise [`inv_or_huge`].
#[inline]
pub fn inv_dir(dir: &Vector<Real>) -> Vector<Real> {
    dir.map(inv_or_huge)
}
