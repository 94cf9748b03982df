//! Absorbers

use radiotrace_core::base::*;
use radiotrace_core::geometry::*;
use radiotrace_core::interaction::*;
use radiotrace_core::material::*;

/// A surface that absorbs every ray, ending its path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Absorber {
    /// Relative permittivity reported for the surface.
    pub permittivity: Float,
}

impl Absorber {
    /// Create a new absorber.
    ///
    /// * `permittivity` - Relative permittivity reported for the surface.
    pub fn new(permittivity: Float) -> Self {
        Self { permittivity }
    }
}

impl Default for Absorber {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Material for Absorber {
    fn is_scattering(&self, _r_in: &Ray, _si: &SurfaceInteraction) -> Option<ScatterRecord> {
        None
    }

    fn relative_permittivity(&self, _frequency: Float) -> Float {
        self.permittivity
    }

    fn name(&self) -> &str {
        "absorber"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_scatters() {
        let r = Ray::new(point3(0.0, 1.0, 0.0), vector3(0.0, -1.0, 0.0));
        let si = SurfaceInteraction::new(point3(0.0, 0.0, 0.0), 1.0, &r, normal3(0.0, 1.0, 0.0), None, 0);
        assert!(Absorber::default().is_scattering(&r, &si).is_none());
    }
}
