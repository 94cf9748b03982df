//! Radio stations

use crate::base::Float;
use crate::geometry::*;
use crate::propagation::{db_to_linear, dbm_to_mw, wavelength};

/// A transmitting antenna.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transmitter {
    /// Antenna position.
    pub position: Point3f,

    /// Pitch in degrees (rotation about the x-axis).
    pub pitch: Float,

    /// Yaw in degrees (rotation about the y-axis).
    pub yaw: Float,

    /// Carrier frequency in Hz.
    pub frequency: Float,

    /// Transmit power in dBm.
    pub power: Float,

    /// Antenna gain in dBi.
    pub gain: Float,
}

impl Transmitter {
    /// Create a new isotropic transmitter facing down the negative z-axis.
    ///
    /// * `position`  - Antenna position.
    /// * `frequency` - Carrier frequency in Hz.
    /// * `power`     - Transmit power in dBm.
    /// * `gain`      - Antenna gain in dBi.
    pub fn new(position: Point3f, frequency: Float, power: Float, gain: Float) -> Self {
        Self {
            position,
            pitch: 0.0,
            yaw: 0.0,
            frequency,
            power,
            gain,
        }
    }

    /// Returns the transmitter with orientation set.
    ///
    /// * `pitch` - Pitch in degrees.
    /// * `yaw`   - Yaw in degrees.
    pub fn with_orientation(self, pitch: Float, yaw: Float) -> Self {
        Self { pitch, yaw, ..self }
    }

    /// Returns the boresight direction given by pitch and yaw.
    pub fn forward(&self) -> Vector3f {
        let t = rotate_y(self.yaw) * rotate_x(self.pitch);
        t.transform_vector(&vector3(0.0, 0.0, -1.0)).normalize()
    }

    /// Returns the wavelength in meters.
    pub fn wavelength(&self) -> Float {
        wavelength(self.frequency)
    }

    /// Returns the transmit power in mW.
    pub fn power_mw(&self) -> Float {
        dbm_to_mw(self.power)
    }

    /// Returns the antenna gain as a linear factor.
    pub fn gain_linear(&self) -> Float {
        db_to_linear(self.gain)
    }
}

/// A receiving antenna with a reception sphere used to catch passing rays.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Receiver {
    /// Antenna position.
    pub position: Point3f,

    /// Antenna gain in dBi.
    pub gain: Float,

    /// Radius of the reception sphere in meters.
    pub radius: Float,
}

impl Receiver {
    /// Create a new receiver.
    ///
    /// * `position` - Antenna position.
    /// * `gain`     - Antenna gain in dBi.
    /// * `radius`   - Radius of the reception sphere.
    pub fn new(position: Point3f, gain: Float, radius: Float) -> Self {
        Self {
            position,
            gain,
            radius,
        }
    }

    /// Returns the antenna gain as a linear factor.
    pub fn gain_linear(&self) -> Float {
        db_to_linear(self.gain)
    }

    /// Returns the ray parameter of the closest approach to the receiver if
    /// the segment `r(t)` for `t` in `t_range` passes through the reception
    /// sphere. The ray direction must be normalized.
    ///
    /// * `r`       - The ray.
    /// * `t_range` - Segment of the ray to test.
    pub fn capture(&self, r: &Ray, t_range: &Interval) -> Option<Float> {
        let t = t_range.clamp((self.position - r.o).dot(&r.d));
        if r.at(t).distance_squared(&self.position) <= self.radius * self.radius {
            Some(t)
        } else {
            None
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
