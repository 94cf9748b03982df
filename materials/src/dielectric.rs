//! Dielectric materials

use crate::common::*;
use radiotrace_core::base::*;
use radiotrace_core::geometry::*;
use radiotrace_core::interaction::*;
use radiotrace_core::material::*;

/// A non-conducting surface that reflects specularly. The real part of the
/// relative permittivity follows the ITU-R P.2040 frequency model
/// `ε' = a · f^b` with `f` in GHz.
#[derive(Clone, Debug, PartialEq)]
pub struct Dielectric {
    /// Name of the material.
    pub name: String,

    /// Permittivity coefficient `a`.
    pub a: Float,

    /// Permittivity exponent `b`.
    pub b: Float,

    /// Fraction of the amplitude kept on reflection, before Fresnel.
    pub reflectivity: Float,
}

impl Dielectric {
    /// Create a new dielectric.
    ///
    /// * `name` - Name of the material.
    /// * `a`    - Permittivity coefficient.
    /// * `b`    - Permittivity exponent.
    pub fn new(name: &str, a: Float, b: Float) -> Self {
        if a < 1.0 {
            warn!(
                "Dielectric '{}' has permittivity coefficient {} below vacuum",
                name, a
            );
        }
        Self {
            name: name.to_string(),
            a,
            b,
            reflectivity: 1.0,
        }
    }

    /// Returns the material with the reflectivity set.
    ///
    /// * `reflectivity` - Fraction of the amplitude kept, clamped to `[0, 1]`.
    pub fn with_reflectivity(self, reflectivity: Float) -> Self {
        Self {
            reflectivity: clamp(reflectivity, 0.0, 1.0),
            ..self
        }
    }

    /// Concrete.
    pub fn concrete() -> Self {
        Self::new("concrete", 5.24, 0.0)
    }

    /// Brick.
    pub fn brick() -> Self {
        Self::new("brick", 3.91, 0.0)
    }

    /// Wood.
    pub fn wood() -> Self {
        Self::new("wood", 1.99, 0.0)
    }

    /// Glass.
    pub fn glass() -> Self {
        Self::new("glass", 6.31, 0.0)
    }

    /// Plasterboard.
    pub fn plasterboard() -> Self {
        Self::new("plasterboard", 2.73, 0.0)
    }

    /// Medium dry ground.
    pub fn medium_dry_ground() -> Self {
        Self::new("medium_dry_ground", 15.0, -0.1)
    }

    /// Very dry ground.
    pub fn very_dry_ground() -> Self {
        Self::new("very_dry_ground", 3.0, 0.0)
    }

    /// Wet ground.
    pub fn wet_ground() -> Self {
        Self::new("wet_ground", 30.0, -0.4)
    }
}

impl Material for Dielectric {
    /// Reflects every incoming ray specularly.
    ///
    /// * `r_in` - The incoming ray.
    /// * `si`   - The surface interaction at the intersection.
    fn is_scattering(&self, r_in: &Ray, si: &SurfaceInteraction) -> Option<ScatterRecord> {
        if self.reflectivity <= 0.0 {
            return None;
        }
        Some(ScatterRecord {
            attenuation: self.reflectivity,
            scattered: specular_reflection(r_in, si),
        })
    }

    /// Returns `a · f^b` with `f` in GHz.
    ///
    /// * `frequency` - Frequency in Hz.
    fn relative_permittivity(&self, frequency: Float) -> Float {
        self.a * (frequency * 1e-9).powf(self.b)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
