//! Primitives

use crate::geometry::*;
use crate::interaction::*;
use std::sync::Arc;

/// Primitive trait provide common behavior for anything a ray can be traced
/// against: single shapes as well as whole acceleration structures.
pub trait Primitive {
    /// Returns a bounding box in the world space.
    fn world_bound(&self) -> Bounds3f;

    /// Returns geometric details of the nearest intersection with parameter
    /// inside `t_range`. If there is no intersection, `None` is returned.
    ///
    /// * `r`       - The ray.
    /// * `t_range` - Valid ray parameters.
    fn intersect(&self, r: &Ray, t_range: &Interval) -> Option<SurfaceInteraction>;

    /// Returns the point used to bin the primitive when building a hierarchy.
    fn centroid(&self) -> Point3f {
        self.world_bound().centroid()
    }
}

/// Atomic referenced counted `Primitive`.
pub type ArcPrimitive = Arc<dyn Primitive + Send + Sync>;

impl<P: Primitive + ?Sized> Primitive for Arc<P> {
    fn world_bound(&self) -> Bounds3f {
        (**self).world_bound()
    }

    fn intersect(&self, r: &Ray, t_range: &Interval) -> Option<SurfaceInteraction> {
        (**self).intersect(r, t_range)
    }

    fn centroid(&self) -> Point3f {
        (**self).centroid()
    }
}
