//! Surface Interaction

use crate::base::{Float, INFINITY};
use crate::geometry::*;
use crate::material::ArcMaterial;
use std::fmt;

/// Identifies a triangle in the scene by its instance and its index inside
/// the instanced mesh.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TriangleRef {
    /// Instance index in the top-level structure.
    pub instance: usize,

    /// Primitive index inside the instanced mesh.
    pub primitive: usize,
}

/// Geometric details of a ray hitting a surface.
#[derive(Clone)]
pub struct SurfaceInteraction {
    /// Hit point.
    pub p: Point3f,

    /// Unit surface normal facing against the incoming ray.
    pub n: Normal3f,

    /// Ray parameter of the hit.
    pub t: Float,

    /// True if the ray hit the side the geometric normal points out of.
    pub front_face: bool,

    /// Material at the hit point, if any.
    pub material: Option<ArcMaterial>,

    /// The triangle that was hit.
    pub triangle: TriangleRef,
}

impl SurfaceInteraction {
    /// Create a new surface interaction. The geometric normal is flipped if
    /// needed so that it opposes the ray direction.
    ///
    /// * `p`         - Hit point.
    /// * `t`         - Ray parameter of the hit.
    /// * `r`         - The incoming ray.
    /// * `outward_n` - Geometric (outward) unit normal.
    /// * `material`  - Material at the hit point.
    /// * `primitive` - Primitive index inside its mesh.
    pub fn new(
        p: Point3f,
        t: Float,
        r: &Ray,
        outward_n: Normal3f,
        material: Option<ArcMaterial>,
        primitive: usize,
    ) -> Self {
        let front_face = r.d.dot(&outward_n) < 0.0;
        let n = if front_face { outward_n } else { -outward_n };
        Self {
            p,
            n,
            t,
            front_face,
            material,
            triangle: TriangleRef {
                instance: 0,
                primitive,
            },
        }
    }

    /// Returns true if a surface was hit.
    pub fn is_hit(&self) -> bool {
        self.t < INFINITY
    }
}

impl Default for SurfaceInteraction {
    /// Returns the "no hit" record at infinite distance.
    fn default() -> Self {
        Self {
            p: Point3f::default(),
            n: Normal3f::default(),
            t: INFINITY,
            front_face: false,
            material: None,
            triangle: TriangleRef::default(),
        }
    }
}

impl fmt::Debug for SurfaceInteraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceInteraction")
            .field("p", &self.p)
            .field("n", &self.n)
            .field("t", &self.t)
            .field("front_face", &self.front_face)
            .field("has_material", &self.material.is_some())
            .field("triangle", &self.triangle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_faces_against_ray() {
        let r = Ray::new(point3(0.0, 1.0, 0.0), vector3(0.0, 1.0, 0.0));
        let si = SurfaceInteraction::new(
            point3(0.0, 2.0, 0.0),
            1.0,
            &r,
            normal3(0.0, 1.0, 0.0),
            None,
            3,
        );
        assert!(!si.front_face);
        assert_eq!(si.n, normal3(0.0, -1.0, 0.0));
        assert_eq!(si.triangle.primitive, 3);
    }

    #[test]
    fn default_is_no_hit() {
        let si = SurfaceInteraction::default();
        assert!(!si.is_hit());
        assert!(si.material.is_none());
    }
}
