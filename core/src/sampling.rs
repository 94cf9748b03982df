//! Deterministic sphere sampling used to launch rays from transmitters.

use crate::base::{Float, PI};
use crate::geometry::{vector3, Vector3f};

/// Golden angle π(3 - √5) in radians.
pub const GOLDEN_ANGLE: Float = PI * 0.763_932;

/// Returns the `i`-th of `n` points of a Fibonacci lattice on the unit
/// sphere. Points are spread with near equal area per point and are stable
/// for a given `n`, so repeated runs launch identical rays.
///
/// * `i` - Point index in `[0, n)`.
/// * `n` - Number of points in the lattice.
pub fn fibonacci_sphere(i: usize, n: usize) -> Vector3f {
    debug_assert!(i < n);

    let y = 1.0 - (i as Float + 0.5) * 2.0 / n as Float;
    let r = (1.0 - y * y).max(0.0).sqrt();
    let phi = i as Float * GOLDEN_ANGLE;
    vector3(r * phi.cos(), y, r * phi.sin())
}

/// Returns all `n` directions of the Fibonacci lattice in index order.
///
/// * `n` - Number of directions.
pub fn fibonacci_directions(n: usize) -> Vec<Vector3f> {
    (0..n).map(|i| fibonacci_sphere(i, n)).collect()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn directions_are_unit_length() {
        for d in fibonacci_directions(500) {
            assert!(approx_eq!(f32, d.length(), 1.0, epsilon = 1e-5));
        }
    }

    #[test]
    fn lattice_is_reproducible() {
        assert_eq!(fibonacci_directions(1000), fibonacci_directions(1000));
    }

    #[test]
    fn lattice_is_balanced() {
        // Mean direction of a well spread set is close to zero.
        let n = 4000;
        let sum = fibonacci_directions(n)
            .iter()
            .fold(vector3(0.0, 0.0, 0.0), |acc, d| acc + *d);
        assert!(sum.length() / (n as Float) < 1e-2);
    }

    #[test]
    fn hemispheres_hold_half_the_points() {
        let up = fibonacci_directions(1000)
            .iter()
            .filter(|d| d.y > 0.0)
            .count();
        assert_eq!(up, 500);
    }

    proptest! {
        #[test]
        fn y_decreases_with_index(n in 2..2000usize, frac in 0.0..1.0f64) {
            let i = ((n - 1) as f64 * frac) as usize;
            let a = fibonacci_sphere(i, n);
            let b = fibonacci_sphere(i + 1, n);
            prop_assert!(a.y > b.y);
        }
    }
}
