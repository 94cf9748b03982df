//! Quads

use radiotrace_core::base::*;
use radiotrace_core::geometry::*;
use radiotrace_core::interaction::*;
use radiotrace_core::material::*;
use radiotrace_core::primitive::*;

/// Denominators smaller than this reject the ray as parallel to the plane.
const PLANE_EPSILON: Float = 1e-8;

/// Thickness given to the bounding box of a flat quad.
const BOUNDS_PADDING: Float = 1e-4;

/// A parallelogram spanned by two edges from a corner.
#[derive(Clone)]
pub struct Quad {
    /// Corner.
    pub q: Point3f,

    /// First edge.
    pub u: Vector3f,

    /// Second edge.
    pub v: Vector3f,

    /// Unit normal `u × v`.
    pub n: Normal3f,

    /// Plane constant `n · q`.
    d: Float,

    /// `(u × v) / |u × v|²` used to find planar coordinates.
    w: Vector3f,

    /// Bounding box.
    bounds: Bounds3f,

    /// Surface material.
    pub material: Option<ArcMaterial>,
}

impl Quad {
    /// Create a new quad.
    ///
    /// * `q`        - Corner.
    /// * `u`        - First edge.
    /// * `v`        - Second edge.
    /// * `material` - Surface material.
    pub fn new(q: Point3f, u: Vector3f, v: Vector3f, material: Option<ArcMaterial>) -> Self {
        let cross = u.cross(&v);
        let len2 = cross.length_squared();
        let (n, w) = if len2 > 0.0 {
            (Normal3f::from(cross / len2.sqrt()), cross / len2)
        } else {
            (Normal3f::default(), Vector3f::zero())
        };
        let d = n.dot(&Vector3f::from(q));

        let b = Bounds3f::from(q)
            .union(&(q + u))
            .union(&(q + v))
            .union(&(q + u + v));
        let pad = vector3(BOUNDS_PADDING, BOUNDS_PADDING, BOUNDS_PADDING);
        let bounds = Bounds3f::new(b.p_min - pad, b.p_max + pad);

        Self {
            q,
            u,
            v,
            n,
            d,
            w,
            bounds,
            material,
        }
    }

    /// Returns the planar coordinates `(alpha, beta)` of a point on the
    /// quad's plane so that `p = q + alpha * u + beta * v`.
    ///
    /// * `p` - Point on the plane.
    pub fn planar_coordinates(&self, p: &Point3f) -> (Float, Float) {
        let planar = *p - self.q;
        let alpha = self.w.dot(&planar.cross(&self.v));
        let beta = self.w.dot(&self.u.cross(&planar));
        (alpha, beta)
    }
}

impl Primitive for Quad {
    /// Returns a bounding box in the world space.
    fn world_bound(&self) -> Bounds3f {
        self.bounds
    }

    /// Intersects the ray with the quad's plane and checks that the hit lies
    /// inside the parallelogram.
    ///
    /// * `r`       - The ray.
    /// * `t_range` - Valid ray parameters (exclusive).
    fn intersect(&self, r: &Ray, t_range: &Interval) -> Option<SurfaceInteraction> {
        let denom = self.n.dot(&r.d);
        if abs(denom) < PLANE_EPSILON {
            return None;
        }

        let t = (self.d - self.n.dot(&Vector3f::from(r.o))) / denom;
        if !t_range.surrounds(t) {
            return None;
        }

        let p = r.at(t);
        let (alpha, beta) = self.planar_coordinates(&p);
        if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
            return None;
        }

        Some(SurfaceInteraction::new(
            p,
            t,
            r,
            self.n,
            self.material.clone(),
            0,
        ))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
