//! Propagation model: Friis free-space power and Fresnel reflection.

use crate::base::{abs, Float, FOUR_PI, SPEED_OF_LIGHT};
use std::fmt;
use std::str::FromStr;

/// Distances at or below this (meters) are treated as near field and do not
/// attenuate.
pub const NEAR_FIELD_DISTANCE: Float = 1.0;

/// Returns the wavelength in meters.
///
/// * `frequency` - Frequency in Hz.
#[inline]
pub fn wavelength(frequency: Float) -> Float {
    SPEED_OF_LIGHT / frequency
}

/// Returns the free-space path-loss factor `(λ / 4πd)²`, clamped to 1 in the
/// near field.
///
/// * `wavelength` - Wavelength in meters.
/// * `d`          - Distance in meters.
pub fn path_loss_factor(wavelength: Float, d: Float) -> Float {
    if d <= NEAR_FIELD_DISTANCE {
        1.0
    } else {
        let a = wavelength / (FOUR_PI * d);
        a * a
    }
}

/// Returns the received power using the Friis transmission equation with an
/// extra reflection coefficient applied to the field amplitude. All inputs
/// are linear.
///
/// * `tx_power`               - Transmit power.
/// * `tx_gain`                - Transmit antenna gain.
/// * `rx_gain`                - Receive antenna gain.
/// * `wavelength`             - Wavelength in meters.
/// * `d`                      - Path length in meters.
/// * `reflection_coefficient` - Product of reflection coefficients along the
///                              path; 1 for line of sight.
pub fn friis_received_power(
    tx_power: Float,
    tx_gain: Float,
    rx_gain: Float,
    wavelength: Float,
    d: Float,
    reflection_coefficient: Float,
) -> Float {
    tx_power
        * tx_gain
        * rx_gain
        * path_loss_factor(wavelength, d)
        * reflection_coefficient
        * reflection_coefficient
}

/// Converts dBm to mW.
///
/// * `dbm` - Power in dBm.
pub fn dbm_to_mw(dbm: Float) -> Float {
    (10.0 as Float).powf(dbm / 10.0)
}

/// Converts mW to dBm. Zero power maps to negative infinity.
///
/// * `mw` - Power in mW.
pub fn mw_to_dbm(mw: Float) -> Float {
    10.0 * mw.log10()
}

/// Converts a gain in dB to a linear factor.
///
/// * `db` - Gain in dB.
pub fn db_to_linear(db: Float) -> Float {
    (10.0 as Float).powf(db / 10.0)
}

/// Converts a linear power ratio to dB.
///
/// * `ratio` - Linear ratio.
pub fn linear_to_db(ratio: Float) -> Float {
    10.0 * ratio.log10()
}

/// Polarization of the incident wave relative to the plane of incidence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Polarization {
    /// Transverse magnetic (parallel).
    TM,

    /// Transverse electric (perpendicular).
    TE,
}

impl Default for Polarization {
    fn default() -> Self {
        Self::TM
    }
}

impl FromStr for Polarization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TM" | "tm" => Ok(Self::TM),
            "TE" | "te" => Ok(Self::TE),
            _ => Err(format!("Unknown polarization '{}'", s)),
        }
    }
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TM => write!(f, "TM"),
            Self::TE => write!(f, "TE"),
        }
    }
}

/// Returns the magnitude of the Fresnel reflection coefficient for a wave
/// travelling from medium 1 into medium 2. Total internal reflection gives 1.
///
/// * `theta`        - Angle of incidence in radians measured from the normal.
/// * `eta1`         - Relative permittivity of the incident medium.
/// * `eta2`         - Relative permittivity of the surface.
/// * `polarization` - Polarization of the incident wave.
pub fn fresnel_coefficient(
    theta: Float,
    eta1: Float,
    eta2: Float,
    polarization: Polarization,
) -> Float {
    let sin_theta = theta.sin();
    if (eta1 / eta2).sqrt() * sin_theta >= 1.0 {
        return 1.0;
    }

    let cos_theta1 = theta.cos();
    let cos_theta2 = (1.0 - (eta1 / eta2) * sin_theta * sin_theta).sqrt();
    let (sqrt_eta1, sqrt_eta2) = (eta1.sqrt(), eta2.sqrt());

    let r = match polarization {
        Polarization::TM => {
            (sqrt_eta2 * cos_theta1 - sqrt_eta1 * cos_theta2)
                / (sqrt_eta2 * cos_theta1 + sqrt_eta1 * cos_theta2)
        }
        Polarization::TE => {
            (sqrt_eta1 * cos_theta1 - sqrt_eta2 * cos_theta2)
                / (sqrt_eta1 * cos_theta1 + sqrt_eta2 * cos_theta2)
        }
    };
    abs(r)
}

/// Same as `fresnel_coefficient` with the polarization given by name
/// (`"TM"` or `"TE"`). An unknown name is logged and gives 0 so that a
/// trace can continue.
///
/// * `theta`        - Angle of incidence in radians.
/// * `eta1`         - Relative permittivity of the incident medium.
/// * `eta2`         - Relative permittivity of the surface.
/// * `polarization` - Polarization name.
pub fn reflection_coefficient(theta: Float, eta1: Float, eta2: Float, polarization: &str) -> Float {
    match polarization.parse::<Polarization>() {
        Ok(p) => fresnel_coefficient(theta, eta1, eta2, p),
        Err(e) => {
            error!("{}; using reflection coefficient 0", e);
            0.0
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::PI;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn unit_distance_does_not_attenuate() {
        assert_eq!(path_loss_factor(0.125, 1.0), 1.0);
        assert_eq!(path_loss_factor(0.125, 0.0), 1.0);
    }

    #[test]
    fn unit_conversions() {
        assert!(approx_eq!(f32, dbm_to_mw(0.0), 1.0));
        assert!(approx_eq!(f32, dbm_to_mw(20.0), 100.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, mw_to_dbm(1000.0), 30.0, epsilon = 1e-4));
        assert_eq!(mw_to_dbm(0.0), Float::NEG_INFINITY);
        assert!(approx_eq!(f32, linear_to_db(db_to_linear(-7.5)), -7.5, epsilon = 1e-4));
    }

    #[test]
    fn wavelength_of_2_4_ghz() {
        assert!(approx_eq!(f32, wavelength(2.4e9), 0.124_913_52, epsilon = 1e-6));
    }

    #[test]
    fn total_internal_reflection() {
        // From a dense medium into a thin one beyond the critical angle.
        assert_eq!(fresnel_coefficient(1.2, 4.0, 1.0, Polarization::TE), 1.0);
        assert_eq!(fresnel_coefficient(1.2, 4.0, 1.0, Polarization::TM), 1.0);
    }

    #[test]
    fn grazing_incidence_reflects_fully() {
        let te = fresnel_coefficient(PI / 2.0 - 1e-4, 1.0, 5.0, Polarization::TE);
        assert!(approx_eq!(f32, te, 1.0, epsilon = 1e-2));
    }

    #[test]
    fn unknown_polarization_gives_zero() {
        assert_eq!(reflection_coefficient(0.3, 1.0, 5.0, "circular"), 0.0);
        assert_eq!(
            reflection_coefficient(0.3, 1.0, 5.0, "TE"),
            fresnel_coefficient(0.3, 1.0, 5.0, Polarization::TE)
        );
    }

    #[test]
    fn parse_polarization() {
        assert_eq!("TM".parse::<Polarization>(), Ok(Polarization::TM));
        assert_eq!("te".parse::<Polarization>(), Ok(Polarization::TE));
        assert!("X".parse::<Polarization>().is_err());
    }

    proptest! {
        #[test]
        fn friis_decreases_with_distance(
            d in 1.0..1000.0f32,
            step in 0.1..100.0f32,
            f in 1e8..1e10f32,
        ) {
            let l = wavelength(f);
            let near = friis_received_power(1.0, 1.0, 1.0, l, d + 0.01, 1.0);
            let far = friis_received_power(1.0, 1.0, 1.0, l, d + 0.01 + step, 1.0);
            prop_assert!(far < near);
        }

        #[test]
        fn friis_inverse_square(d in 1.5..500.0f32, f in 1e8..1e10f32) {
            let l = wavelength(f);
            let p1 = friis_received_power(10.0, 2.0, 3.0, l, d, 1.0);
            let p2 = friis_received_power(10.0, 2.0, 3.0, l, 2.0 * d, 1.0);
            prop_assert!(approx_eq!(f32, p1 / p2, 4.0, epsilon = 1e-3));
        }

        #[test]
        fn friis_scales_with_coefficient_squared(d in 1.5..500.0f32, r in 0.0..1.0f32) {
            let l = wavelength(2.4e9);
            let p = friis_received_power(1.0, 1.0, 1.0, l, d, 1.0);
            let pr = friis_received_power(1.0, 1.0, 1.0, l, d, r);
            prop_assert!(approx_eq!(f32, pr, p * r * r, epsilon = p * 1e-5));
        }

        #[test]
        fn normal_incidence_polarizations_agree(eta1 in 1.0..10.0f32, eta2 in 1.0..10.0f32) {
            let tm = fresnel_coefficient(0.0, eta1, eta2, Polarization::TM);
            let te = fresnel_coefficient(0.0, eta1, eta2, Polarization::TE);
            let expected = abs((eta2.sqrt() - eta1.sqrt()) / (eta2.sqrt() + eta1.sqrt()));
            prop_assert!(approx_eq!(f32, tm, te, epsilon = 1e-6));
            prop_assert!(approx_eq!(f32, tm, expected, epsilon = 1e-6));
        }

        #[test]
        fn coefficient_is_a_magnitude(
            theta in 0.0..1.5f32,
            eta2 in 1.0..80.0f32,
            te in prop::bool::ANY,
        ) {
            let p = if te { Polarization::TE } else { Polarization::TM };
            let r = fresnel_coefficient(theta, 1.0, eta2, p);
            prop_assert!((0.0..=1.0).contains(&r));
        }
    }
}
