//! Material

use crate::base::Float;
use crate::geometry::*;
use crate::interaction::*;
use std::sync::Arc;

/// Result of a ray scattering off a surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScatterRecord {
    /// Fraction of the amplitude kept by the surface itself, independent of
    /// the Fresnel term.
    pub attenuation: Float,

    /// The outgoing ray.
    pub scattered: Ray,
}

/// Material trait provides common behavior.
pub trait Material {
    /// Returns the scattered ray if the material reflects the incoming ray,
    /// or `None` if the ray is absorbed.
    ///
    /// * `r_in` - The incoming ray.
    /// * `si`   - The surface interaction at the intersection.
    fn is_scattering(&self, r_in: &Ray, si: &SurfaceInteraction) -> Option<ScatterRecord>;

    /// Returns the relative permittivity of the material at a frequency.
    ///
    /// * `frequency` - Frequency in Hz.
    fn relative_permittivity(&self, frequency: Float) -> Float;

    /// Returns a short display name.
    fn name(&self) -> &str {
        "material"
    }
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<dyn Material + Send + Sync>;
