//! 3-D Points

use super::Vector3f;
use crate::base::{max, min, Axis, Float};
use std::ops::{Add, Div, Index, Sub};

/// A position in world or object space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

/// Creates a new point.
///
/// * `x` - X-coordinate.
/// * `y` - Y-coordinate.
/// * `z` - Z-coordinate.
pub const fn point3(x: Float, y: Float, z: Float) -> Point3f {
    Point3f { x, y, z }
}

impl Point3f {
    /// Returns true if any coordinate is NaN.
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Component-wise minimum.
    ///
    /// * `other` - The other point.
    pub fn min(&self, other: &Self) -> Self {
        point3(min(self.x, other.x), min(self.y, other.y), min(self.z, other.z))
    }

    /// Component-wise maximum.
    ///
    /// * `other` - The other point.
    pub fn max(&self, other: &Self) -> Self {
        point3(max(self.x, other.x), max(self.y, other.y), max(self.z, other.z))
    }

    pub fn distance(&self, other: &Self) -> Float {
        (*self - *other).length()
    }

    pub fn distance_squared(&self, other: &Self) -> Float {
        (*self - *other).length_squared()
    }
}

impl Add<Vector3f> for Point3f {
    type Output = Point3f;

    fn add(self, v: Vector3f) -> Point3f {
        point3(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl Sub<Vector3f> for Point3f {
    type Output = Point3f;

    fn sub(self, v: Vector3f) -> Point3f {
        point3(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl Sub for Point3f {
    type Output = Vector3f;

    /// Returns the vector from `p` to `self`.
    fn sub(self, p: Point3f) -> Vector3f {
        Vector3f::from(self) - Vector3f::from(p)
    }
}

impl Div<Float> for Point3f {
    type Output = Point3f;

    /// Divides homogeneous coordinates by `w`.
    fn div(self, w: Float) -> Point3f {
        debug_assert!(w != 0.0);
        Point3f::from(Vector3f::from(self) / w)
    }
}

impl Index<Axis> for Point3f {
    type Output = Float;

    /// Coordinate along an axis.
    ///
    /// * `axis` - The axis.
    fn index(&self, axis: Axis) -> &Float {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

impl From<Vector3f> for Point3f {
    /// The point reached from the origin by `v`.
    fn from(v: Vector3f) -> Self {
        point3(v.x, v.y, v.z)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
