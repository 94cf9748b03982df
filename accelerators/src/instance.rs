//! BVH Instances

use crate::bvh::*;
use radiotrace_core::geometry::*;
use radiotrace_core::interaction::*;
use radiotrace_core::primitive::*;
use std::sync::Arc;

/// A shared BVH placed in the world with an affine transform. Many instances
/// may reference the same BVH.
pub struct BVHInstance<P: Primitive> {
    /// The shared hierarchy in object space.
    bvh: Arc<BVH<P>>,

    /// Object to world transform.
    object_to_world: Transform,

    /// World to object transform.
    world_to_object: Transform,

    /// World space bounds.
    bounds: Bounds3f,
}

impl<P: Primitive> BVHInstance<P> {
    /// Create a new instance.
    ///
    /// * `bvh`       - The shared hierarchy.
    /// * `transform` - Object to world transform.
    pub fn new(bvh: Arc<BVH<P>>, transform: Transform) -> Self {
        let bounds = transform.transform_bounds(&bvh.world_bound());
        Self {
            bvh,
            object_to_world: transform,
            world_to_object: transform.inverse(),
            bounds,
        }
    }

    /// Replace the transform. The inverse and the world bounds are
    /// recomputed.
    ///
    /// * `transform` - Object to world transform.
    pub fn set_transform(&mut self, transform: Transform) {
        self.object_to_world = transform;
        self.world_to_object = transform.inverse();
        self.bounds = transform.transform_bounds(&self.bvh.world_bound());
    }

    /// Returns the object to world transform.
    pub fn transform(&self) -> &Transform {
        &self.object_to_world
    }

    /// Returns the shared hierarchy.
    pub fn bvh(&self) -> &Arc<BVH<P>> {
        &self.bvh
    }
}

impl<P: Primitive> Clone for BVHInstance<P> {
    fn clone(&self) -> Self {
        Self {
            bvh: Arc::clone(&self.bvh),
            object_to_world: self.object_to_world,
            world_to_object: self.world_to_object,
            bounds: self.bounds,
        }
    }
}

impl<P: Primitive> Primitive for BVHInstance<P> {
    /// Returns the bounds of the eight transformed corners of the BVH root.
    fn world_bound(&self) -> Bounds3f {
        self.bounds
    }

    /// Intersects the ray in object space. The direction is not
    /// renormalized so the hit parameter is the same in both spaces.
    ///
    /// * `r`       - The ray.
    /// * `t_range` - Valid ray parameters.
    fn intersect(&self, r: &Ray, t_range: &Interval) -> Option<SurfaceInteraction> {
        let ray = self.world_to_object.transform_ray(r);
        let mut si = self.bvh.intersect(&ray, t_range)?;

        // Recover the winding normal and carry it to world space; a mirroring
        // transform reverses the winding.
        let outward = if si.front_face { si.n } else { -si.n };
        let mut n = self.object_to_world.transform_normal(&outward).normalize();
        if self.object_to_world.swaps_handedness() {
            n = -n;
        }

        si.p = self.object_to_world.transform_point(&si.p);
        si.front_face = r.d.dot(&n) < 0.0;
        si.n = n.face_against(&r.d);
        Some(si)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
