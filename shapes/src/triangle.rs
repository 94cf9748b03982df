//! Triangles

use radiotrace_core::base::*;
use radiotrace_core::geometry::*;
use radiotrace_core::interaction::*;
use radiotrace_core::material::*;
use radiotrace_core::primitive::*;
use std::fmt;

/// Determinants smaller than this reject the ray as parallel to the
/// triangle.
pub const TRIANGLE_EPSILON: Float = 1e-9;

/// A single triangle with its derived data cached.
#[derive(Clone)]
pub struct Triangle {
    /// First vertex.
    pub a: Point3f,

    /// Second vertex.
    pub b: Point3f,

    /// Third vertex.
    pub c: Point3f,

    /// Edge `b - a`.
    pub edge1: Vector3f,

    /// Edge `c - a`.
    pub edge2: Vector3f,

    /// Unit normal following the winding `a, b, c`. Zero for degenerate
    /// triangles.
    pub n: Normal3f,

    /// Vertex centroid.
    pub centroid: Point3f,

    /// Bounding box.
    pub bounds: Bounds3f,

    /// Shared surface material.
    pub material: Option<ArcMaterial>,

    /// Index of the triangle in its mesh.
    pub index: usize,
}

impl Triangle {
    /// Create a new triangle.
    ///
    /// * `a`        - First vertex.
    /// * `b`        - Second vertex.
    /// * `c`        - Third vertex.
    /// * `material` - Shared surface material.
    /// * `index`    - Index of the triangle in its mesh.
    pub fn new(
        a: Point3f,
        b: Point3f,
        c: Point3f,
        material: Option<ArcMaterial>,
        index: usize,
    ) -> Self {
        let edge1 = b - a;
        let edge2 = c - a;
        let cross = edge1.cross(&edge2);
        let len = cross.length();
        let n = if len > 0.0 {
            Normal3f::from(cross / len)
        } else {
            Normal3f::default()
        };

        Self {
            a,
            b,
            c,
            edge1,
            edge2,
            n,
            centroid: a + (edge1 + edge2) / 3.0,
            bounds: Bounds3f::from(a).union(&b).union(&c),
            material,
            index,
        }
    }

    /// Returns the surface area.
    pub fn area(&self) -> Float {
        0.5 * self.edge1.cross(&self.edge2).length()
    }

    /// Returns true if the triangle has no area.
    pub fn is_degenerate(&self) -> bool {
        self.n == Normal3f::default()
    }
}

impl Primitive for Triangle {
    /// Returns a bounding box in the world space.
    fn world_bound(&self) -> Bounds3f {
        self.bounds
    }

    /// Möller–Trumbore intersection. Hits on edges and vertices count.
    ///
    /// * `r`       - The ray.
    /// * `t_range` - Valid ray parameters (exclusive).
    fn intersect(&self, r: &Ray, t_range: &Interval) -> Option<SurfaceInteraction> {
        let pvec = r.d.cross(&self.edge2);
        let det = self.edge1.dot(&pvec);
        if abs(det) < TRIANGLE_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = r.o - self.a;
        let u = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(&self.edge1);
        let v = r.d.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = self.edge2.dot(&qvec) * inv_det;
        if !t_range.surrounds(t) {
            return None;
        }

        Some(SurfaceInteraction::new(
            r.at(t),
            t,
            r,
            self.n,
            self.material.clone(),
            self.index,
        ))
    }

    /// Returns the vertex centroid.
    fn centroid(&self) -> Point3f {
        self.centroid
    }
}

impl fmt::Debug for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Triangle")
            .field("a", &self.a)
            .field("b", &self.b)
            .field("c", &self.c)
            .field("index", &self.index)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            point3(0.0, 0.0, 0.0),
            point3(1.0, 0.0, 0.0),
            point3(0.0, 1.0, 0.0),
            None,
            0,
        )
    }

    fn positive() -> Interval {
        Interval::new(0.0, INFINITY)
    }

    #[test]
    fn hit_at_vertex() {
        let tri = unit_triangle();
        let r = Ray::new(point3(0.0, 0.0, 1.0), vector3(0.0, 0.0, -1.0));
        let si = tri.intersect(&r, &positive()).unwrap();
        assert!(approx_eq!(f32, si.t, 1.0));
        assert_eq!(si.p, point3(0.0, 0.0, 0.0));
        assert!(si.front_face);
        assert_eq!(si.n, normal3(0.0, 0.0, 1.0));
    }

    #[test]
    fn pointing_away_misses() {
        let tri = unit_triangle();
        let r = Ray::new(point3(0.0, 0.0, 1.0), vector3(0.0, 0.0, 1.0));
        assert!(tri.intersect(&r, &positive()).is_none());
    }

    #[test]
    fn back_face_hit_flips_normal() {
        let tri = unit_triangle();
        let r = Ray::new(point3(0.25, 0.25, -2.0), vector3(0.0, 0.0, 1.0));
        let si = tri.intersect(&r, &positive()).unwrap();
        assert!(!si.front_face);
        assert_eq!(si.n, normal3(0.0, 0.0, -1.0));
        assert!(approx_eq!(f32, si.t, 2.0));
    }

    #[test]
    fn parallel_ray_misses() {
        let tri = unit_triangle();
        let r = Ray::new(point3(-1.0, 0.25, 0.0), vector3(1.0, 0.0, 0.0));
        assert!(tri.intersect(&r, &positive()).is_none());
    }

    #[test]
    fn range_is_respected() {
        let tri = unit_triangle();
        let r = Ray::new(point3(0.25, 0.25, 1.0), vector3(0.0, 0.0, -1.0));
        assert!(tri.intersect(&r, &Interval::new(0.0, 0.5)).is_none());
        assert!(tri.intersect(&r, &Interval::new(1.5, 3.0)).is_none());
        assert!(tri.intersect(&r, &Interval::new(0.5, 1.5)).is_some());
    }

    #[test]
    fn degenerate_triangle_never_hits() {
        let tri = Triangle::new(
            point3(0.0, 0.0, 0.0),
            point3(1.0, 1.0, 1.0),
            point3(2.0, 2.0, 2.0),
            None,
            0,
        );
        assert!(tri.is_degenerate());
        let r = Ray::new(point3(1.0, 1.0, 5.0), vector3(0.0, 0.0, -1.0));
        assert!(tri.intersect(&r, &positive()).is_none());
    }

    #[test]
    fn cached_data() {
        let tri = unit_triangle();
        assert_eq!(tri.area(), 0.5);
        assert_eq!(
            tri.world_bound(),
            Bounds3f::new(point3(0.0, 0.0, 0.0), point3(1.0, 1.0, 0.0))
        );
        assert!(approx_eq!(f32, tri.centroid().x, 1.0 / 3.0));
    }

    proptest! {
        #[test]
        fn hits_lie_inside_triangle(
            u in 0.01..0.98f32,
            frac in 0.01..0.99f32,
            ox in -5.0..5.0f32,
            oy in -5.0..5.0f32,
            oz in 1.0..5.0f32,
        ) {
            let tri = Triangle::new(
                point3(-1.0, -1.0, 0.5),
                point3(2.0, -1.0, 0.0),
                point3(0.0, 3.0, -0.5),
                None,
                0,
            );
            let v = (1.0 - u) * frac;
            let target = tri.a + tri.edge1 * u + tri.edge2 * v;
            let o = point3(ox, oy, oz + 1.0);
            let d = (target - o).normalize();
            let r = Ray::new(o, d);
            let si = tri.intersect(&r, &positive());
            prop_assert!(si.is_some());
            if let Some(si) = si {
                prop_assert!(si.p.distance(&target) < 1e-3);
                prop_assert!(approx_eq!(f32, si.t, o.distance(&target), epsilon = 1e-3));
            }
        }
    }
}
