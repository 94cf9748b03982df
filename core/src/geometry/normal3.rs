//! 3-D Normals

use super::{Dot, Vector3f};
use crate::base::Float;
use std::ops::Neg;

/// Surface normal. Kept apart from `Vector3f` because transforms map normals
/// with the inverse transpose.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Normal3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

/// Creates a new normal.
///
/// * `x` - X-component.
/// * `y` - Y-component.
/// * `z` - Z-component.
pub const fn normal3(x: Float, y: Float, z: Float) -> Normal3f {
    Normal3f { x, y, z }
}

impl Normal3f {
    pub fn length(&self) -> Float {
        Vector3f::from(*self).length()
    }

    pub fn normalize(&self) -> Self {
        Normal3f::from(Vector3f::from(*self).normalize())
    }

    /// Returns the normal flipped, if needed, so it opposes `v`.
    ///
    /// * `v` - Incoming direction.
    pub fn face_against(&self, v: &Vector3f) -> Self {
        if self.dot(v) > 0.0 {
            -*self
        } else {
            *self
        }
    }
}

impl Dot<Normal3f> for Normal3f {
    fn dot(&self, n: &Normal3f) -> Float {
        self.x * n.x + self.y * n.y + self.z * n.z
    }
}

impl Dot<Vector3f> for Normal3f {
    fn dot(&self, v: &Vector3f) -> Float {
        v.dot(self)
    }
}

impl Neg for Normal3f {
    type Output = Normal3f;

    fn neg(self) -> Normal3f {
        normal3(-self.x, -self.y, -self.z)
    }
}

impl From<Vector3f> for Normal3f {
    fn from(v: Vector3f) -> Self {
        normal3(v.x, v.y, v.z)
    }
}
