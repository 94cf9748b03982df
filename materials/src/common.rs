//! Common

use radiotrace_core::base::*;
use radiotrace_core::geometry::*;
use radiotrace_core::interaction::*;

/// Relative permittivity used for perfect conductors. Large enough that the
/// Fresnel coefficient is 1 for all but grazing incidence.
pub const CONDUCTOR_PERMITTIVITY: Float = 1e12;

/// Returns the mirror reflection of an incoming ray at a hit point. The new
/// origin is lifted off the surface along the normal so that the reflected
/// ray does not hit the same surface again.
///
/// * `r_in` - The incoming ray.
/// * `si`   - The surface interaction.
pub fn specular_reflection(r_in: &Ray, si: &SurfaceInteraction) -> Ray {
    let d = r_in.d.normalize().reflect(&si.n).normalize();
    let o = si.p + Vector3f::from(si.n) * RAY_EPSILON;
    Ray::new(o, d)
}
