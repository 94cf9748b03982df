//! 3-D Vectors

use super::{Dot, Normal3f, Point3f};
use crate::base::{Axis, Float};
use std::ops::{Add, Div, Index, Mul, Neg, Sub};

/// A direction or offset in world or object space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

/// Creates a new vector.
///
/// * `x` - X-component.
/// * `y` - Y-component.
/// * `z` - Z-component.
pub const fn vector3(x: Float, y: Float, z: Float) -> Vector3f {
    Vector3f { x, y, z }
}

impl Vector3f {
    /// Returns the zero vector.
    pub const fn zero() -> Self {
        vector3(0.0, 0.0, 0.0)
    }

    pub fn length_squared(&self) -> Float {
        self.dot(self)
    }

    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }

    /// Returns the vector scaled to unit length. A zero vector yields NaNs.
    pub fn normalize(&self) -> Self {
        *self / self.length()
    }

    /// Returns the cross product `self × other`.
    ///
    /// * `other` - The other vector.
    pub fn cross(&self, other: &Self) -> Self {
        vector3(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Returns the axis of the largest component. Ties go to the later axis.
    pub fn max_dimension(&self) -> Axis {
        if self.x > self.y && self.x > self.z {
            Axis::X
        } else if self.y > self.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Mirror the direction about a unit normal. An incoming direction
    /// pointing into the surface comes out pointing away from it.
    ///
    /// * `n` - The surface normal.
    pub fn reflect(&self, n: &Normal3f) -> Self {
        *self - 2.0 * self.dot(n) * Vector3f::from(*n)
    }
}

impl Dot<Vector3f> for Vector3f {
    fn dot(&self, other: &Vector3f) -> Float {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl Dot<Normal3f> for Vector3f {
    fn dot(&self, other: &Normal3f) -> Float {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl Add for Vector3f {
    type Output = Vector3f;

    fn add(self, v: Vector3f) -> Vector3f {
        vector3(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl Sub for Vector3f {
    type Output = Vector3f;

    fn sub(self, v: Vector3f) -> Vector3f {
        vector3(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl Mul<Float> for Vector3f {
    type Output = Vector3f;

    fn mul(self, s: Float) -> Vector3f {
        vector3(self.x * s, self.y * s, self.z * s)
    }
}

impl Mul<Vector3f> for Float {
    type Output = Vector3f;

    fn mul(self, v: Vector3f) -> Vector3f {
        v * self
    }
}

impl Div<Float> for Vector3f {
    type Output = Vector3f;

    fn div(self, s: Float) -> Vector3f {
        debug_assert!(s != 0.0);
        self * (1.0 / s)
    }
}

impl Neg for Vector3f {
    type Output = Vector3f;

    fn neg(self) -> Vector3f {
        vector3(-self.x, -self.y, -self.z)
    }
}

impl Index<Axis> for Vector3f {
    type Output = Float;

    /// Component along an axis.
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

impl From<Point3f> for Vector3f {
    /// Offset of a point from the origin.
    fn from(p: Point3f) -> Self {
        vector3(p.x, p.y, p.z)
    }
}

impl From<Normal3f> for Vector3f {
    fn from(n: Normal3f) -> Self {
        vector3(n.x, n.y, n.z)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
