//! Propagation path records.

use crate::base::{Float, SPEED_OF_LIGHT, TWO_PI};
use crate::geometry::*;
use crate::interaction::TriangleRef;
use crate::material::ArcMaterial;
use crate::propagation::{linear_to_db, mw_to_dbm};
use std::fmt;

/// How a traced path ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Termination {
    /// Still being traced.
    Traveling,

    /// Hit a surface that does not reflect.
    Absorbed,

    /// Reached the reflection limit.
    MaxReflections,

    /// Left the scene without hitting anything.
    Escaped,

    /// Passed through a receiver's reception sphere.
    Received,
}

/// The ordered points a ray visited from its transmitter, with the surfaces
/// it reflected off and accumulated signal attributes.
#[derive(Clone)]
pub struct PathRecord {
    /// Source, reflection points and final point.
    pub points: Vec<Point3f>,

    /// Material of each reflection point.
    pub materials: Vec<Option<ArcMaterial>>,

    /// Triangle of each reflection point.
    pub triangles: Vec<TriangleRef>,

    /// Number of reflections.
    pub reflections: usize,

    /// Path loss in dB relative to the transmit power.
    pub loss: Float,

    /// Signal strength in mW.
    pub strength: Float,

    /// Propagation delay in seconds.
    pub delay: Float,

    /// Total unfolded path length in meters.
    pub distance: Float,

    /// Carrier phase at the end of the path in radians, in `[0, 2π)`.
    pub phase: Float,

    /// Product of the reflection coefficients along the path.
    pub coefficient: Float,

    /// Index of the transmitter the path started from.
    pub transmitter: usize,

    /// Index of the receiver for received paths.
    pub receiver: Option<usize>,

    /// How the path ended.
    pub termination: Termination,
}

impl PathRecord {
    /// Start a new path at a transmitter.
    ///
    /// * `source`      - Transmitter position.
    /// * `transmitter` - Transmitter index.
    /// * `strength`    - Transmit power in mW.
    pub fn new(source: Point3f, transmitter: usize, strength: Float) -> Self {
        Self {
            points: vec![source],
            materials: vec![],
            triangles: vec![],
            reflections: 0,
            loss: 0.0,
            strength,
            delay: 0.0,
            distance: 0.0,
            phase: 0.0,
            coefficient: 1.0,
            transmitter,
            receiver: None,
            termination: Termination::Traveling,
        }
    }

    /// Returns the first point.
    pub fn source(&self) -> Point3f {
        self.points[0]
    }

    /// Returns the last point.
    pub fn last(&self) -> Point3f {
        self.points[self.points.len() - 1]
    }

    /// Extend the path by a segment to `p` and accumulate its length.
    ///
    /// * `p` - The next point.
    pub fn extend(&mut self, p: Point3f) {
        self.distance += self.last().distance(&p);
        self.points.push(p);
    }

    /// Append a reflection point.
    ///
    /// * `p`           - Reflection point.
    /// * `material`    - Material of the reflecting surface.
    /// * `triangle`    - Triangle that was hit.
    /// * `coefficient` - Reflection coefficient at the point.
    pub fn reflect(
        &mut self,
        p: Point3f,
        material: Option<ArcMaterial>,
        triangle: TriangleRef,
        coefficient: Float,
    ) {
        self.extend(p);
        self.materials.push(material);
        self.triangles.push(triangle);
        self.reflections += 1;
        self.coefficient *= coefficient;
    }

    /// Update strength, loss, delay and phase from the current distance.
    ///
    /// * `strength`   - New signal strength in mW.
    /// * `tx_power`   - Transmit power in mW.
    /// * `wavelength` - Wavelength in meters.
    pub fn update_signal(&mut self, strength: Float, tx_power: Float, wavelength: Float) {
        self.strength = strength;
        self.loss = linear_to_db(tx_power / strength);
        self.delay = self.distance / SPEED_OF_LIGHT;
        self.phase = (TWO_PI * self.distance / wavelength).rem_euclid(TWO_PI);
    }

    /// Returns the signal strength in dBm.
    pub fn strength_dbm(&self) -> Float {
        mw_to_dbm(self.strength)
    }

    /// Mark the path as finished.
    ///
    /// * `termination` - Reason.
    pub fn terminate(&mut self, termination: Termination) {
        self.termination = termination;
    }
}

impl fmt::Debug for PathRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRecord")
            .field("points", &self.points)
            .field("triangles", &self.triangles)
            .field("reflections", &self.reflections)
            .field("loss", &self.loss)
            .field("strength", &self.strength)
            .field("delay", &self.delay)
            .field("distance", &self.distance)
            .field("phase", &self.phase)
            .field("transmitter", &self.transmitter)
            .field("receiver", &self.receiver)
            .field("termination", &self.termination)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn reflections_accumulate_distance_and_coefficient() {
        let mut path = PathRecord::new(point3(0.0, 0.0, 0.0), 0, 100.0);
        path.reflect(point3(3.0, 4.0, 0.0), None, TriangleRef::default(), 0.5);
        path.reflect(
            point3(3.0, 4.0, 12.0),
            None,
            TriangleRef {
                instance: 1,
                primitive: 2,
            },
            0.5,
        );
        assert_eq!(path.reflections, 2);
        assert_eq!(path.points.len(), 3);
        assert_eq!(path.materials.len(), 2);
        assert!(approx_eq!(f32, path.distance, 17.0));
        assert!(approx_eq!(f32, path.coefficient, 0.25));
        assert_eq!(path.last(), point3(3.0, 4.0, 12.0));
        assert_eq!(path.source(), point3(0.0, 0.0, 0.0));
    }

    #[test]
    fn signal_update() {
        let mut path = PathRecord::new(point3(0.0, 0.0, 0.0), 0, 100.0);
        path.extend(point3(299.792_458, 0.0, 0.0));
        path.update_signal(1.0, 100.0, 1.0);
        assert!(approx_eq!(f32, path.loss, 20.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, path.delay, 1e-6, epsilon = 1e-12));
        assert!(path.phase >= 0.0 && path.phase < TWO_PI);
        assert!(approx_eq!(f32, path.strength_dbm(), 0.0));
    }
}
