//! Axis Aligned Bounding Box.

use crate::math::{Point, Real, Vector, DIM, TWO_DIM};
use num::Bounded;

/// An Axis-Aligned Bounding Box (AABB).
///
/// The root of a KD-tree and each of its leaves are delimited by an AABB. A
/// leaf box is the cell of space the leaf is responsible for: every triangle
/// listed by the leaf overlaps it, and each of its six faces carries a rope
/// to the neighboring part of the tree.
///
/// # Structure
///
/// - **mins**: The point with the smallest coordinates on each axis.
/// - **maxs**: The point with the largest coordinates on each axis.
/// - **Invariant**: `mins.x ≤ maxs.x`, `mins.y ≤ maxs.y` and `mins.z ≤ maxs.z`.
///
/// # Example
///
/// ```rust
/// use kdtrace3d::bounding_volume::Aabb;
/// use nalgebra::Point3;
///
/// let aabb = Aabb::new(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5));
///
/// assert!(aabb.contains_local_point(&Point3::origin()));
/// assert_eq!(aabb.center(), Point3::origin());
/// assert_eq!(aabb.extents().x, 1.0);
/// ```
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "bytemuck-serialize",
    derive(bytemuck::Pod, bytemuck::Zeroable)
)]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with minimum coordinates.
    pub mins: Point<Real>,
    /// The point with maximum coordinates.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new AABB from its minimum and maximum corners.
    ///
    /// Each component of `mins` should be ≤ the corresponding component of `maxs`.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` set to the largest value and `maxs`
    /// to the smallest one.
    ///
    /// Merging points or boxes into it yields their tight bounding box.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::max_value()).into(),
            Vector::repeat(-Real::max_value()).into(),
        )
    }

    /// Creates a new AABB from its center and half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates the AABB of the raw `[mins, maxs]` coordinates stored by the
    /// tree builder.
    #[inline]
    pub fn from_raw(raw: [[Real; 3]; 2]) -> Self {
        Self::new(Point::from(raw[0]), Point::from(raw[1]))
    }

    /// Creates a new AABB that tightly encloses a set of points.
    ///
    /// An empty iterator yields [`Aabb::new_invalid`].
    ///
    /// ```rust
    /// use kdtrace3d::bounding_volume::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::from_points([
    ///     Point3::new(1.0, 2.0, 3.0),
    ///     Point3::new(-1.0, 4.0, 2.0),
    ///     Point3::new(0.0, 0.0, 5.0),
    /// ]);
    ///
    /// assert_eq!(aabb.mins, Point3::new(-1.0, 0.0, 2.0));
    /// assert_eq!(aabb.maxs, Point3::new(1.0, 4.0, 5.0));
    /// ```
    pub fn from_points<I>(pts: I) -> Self
    where
        I: IntoIterator<Item = Point<Real>>,
    {
        let mut result = Self::new_invalid();

        for pt in pts {
            result.take_point(pt);
        }

        result
    }

    /// Returns the center point of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// Returns the half-extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        (self.maxs - self.mins) * 0.5
    }

    /// Returns the full extents of this AABB.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// Is `mins <= maxs` on every axis?
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..DIM).all(|i| self.mins[i] <= self.maxs[i])
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    #[inline]
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// The smallest AABB containing both `self` and `other`.
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }

    /// Do `self` and `other` overlap (touching boxes included)?
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.maxs) && na::partial_ge(&self.maxs, &other.mins)
    }

    /// Does this AABB contain the point `point`, boundary included?
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        for i in 0..DIM {
            if point[i] < self.mins[i] || point[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// Splits this AABB at `split` along `axis`, returning the lower and the
    /// upper halves.
    ///
    /// `split` is expected to lie inside `[mins[axis], maxs[axis]]`.
    #[inline]
    pub fn split_at(&self, axis: usize, split: Real) -> (Aabb, Aabb) {
        let mut left = *self;
        let mut right = *self;
        left.maxs[axis] = split;
        right.mins[axis] = split;
        (left, right)
    }
}

/// One of the six faces of an [`Aabb`].
///
/// Faces are numbered `-x, +x, -y, +y, -z, +z`, i.e., `2 * axis` for the face
/// lying on `mins[axis]` and `2 * axis + 1` for the face lying on `maxs[axis]`.
/// This is also the order of the ropes of a KD-tree leaf.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
#[repr(u8)]
pub enum BoxFace {
    /// The face lying on `mins.x`.
    NegX = 0,
    /// The face lying on `maxs.x`.
    PosX = 1,
    /// The face lying on `mins.y`.
    NegY = 2,
    /// The face lying on `maxs.y`.
    PosY = 3,
    /// The face lying on `mins.z`.
    NegZ = 4,
    /// The face lying on `maxs.z`.
    PosZ = 5,
}

impl BoxFace {
    /// All the faces, in rope order.
    pub const ALL: [BoxFace; TWO_DIM] = [
        BoxFace::NegX,
        BoxFace::PosX,
        BoxFace::NegY,
        BoxFace::PosY,
        BoxFace::NegZ,
        BoxFace::PosZ,
    ];

    /// The face orthogonal to `axis`, on the `maxs` side if `positive` is `true`.
    ///
    /// Panics if `axis >= 3`.
    #[inline]
    pub fn new(axis: usize, positive: bool) -> Self {
        Self::ALL[axis * 2 + positive as usize]
    }

    /// The index of this face, in `0..6`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The axis this face is orthogonal to.
    #[inline]
    pub fn axis(self) -> usize {
        self.index() / 2
    }

    /// Does this face lie on the `maxs` side of the box?
    #[inline]
    pub fn is_positive(self) -> bool {
        self.index() % 2 == 1
    }

    /// The face on the other side of the box.
    #[inline]
    pub fn opposite(self) -> Self {
        Self::ALL[self.index() ^ 1]
    }
}
