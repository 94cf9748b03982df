//! Metals

use crate::common::*;
use radiotrace_core::base::*;
use radiotrace_core::geometry::*;
use radiotrace_core::interaction::*;
use radiotrace_core::material::*;

/// A perfectly conducting surface that reflects specularly.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Metal;

impl Material for Metal {
    /// Reflects every incoming ray specularly.
    ///
    /// * `r_in` - The incoming ray.
    /// * `si`   - The surface interaction at the intersection.
    fn is_scattering(&self, r_in: &Ray, si: &SurfaceInteraction) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: 1.0,
            scattered: specular_reflection(r_in, si),
        })
    }

    fn relative_permittivity(&self, _frequency: Float) -> Float {
        CONDUCTOR_PERMITTIVITY
    }

    fn name(&self) -> &str {
        "metal"
    }
}
