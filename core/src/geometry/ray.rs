//! Rays

use super::{Point3f, Vector3f};
use crate::base::Float;
use std::fmt;

/// A half-line `o + t * d`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction. Unit length in world space; rays carried into an
    /// instance's local space keep the scaled direction so that `t` agrees
    /// in both spaces.
    pub d: Vector3f,
}

impl Ray {
    /// Returns a new ray.
    ///
    /// * `o` - Origin.
    /// * `d` - Direction.
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Self { o, d }
    }

    /// Returns the point at parameter `t`.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (o, d) = (self.o, self.d);
        write!(f, "({} {} {}) + t({} {} {})", o.x, o.y, o.z, d.x, d.y, d.z)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
