//! Random Number Generator.
//!
//! Tracing itself is deterministic and never draws random numbers. The
//! generator is used to lay out procedural scenes and to produce test inputs
//! and always takes an explicit seed.

use crate::base::{min, Float, TWO_PI};
use crate::geometry::{vector3, Vector3f};

/// 32-bit precision value for 1 - epsilon.
pub const ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1"); // 0.99999994

const PCG32_DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;
const PCG32_MULT: u64 = 0x5851f42d4c957f2d;

/// PCG32 pseudo-random number generator.
#[derive(Clone, Debug)]
pub struct RNG {
    state: u64,
    inc: u64,
}

impl Default for RNG {
    /// Return a new instance of `RNG` with default state and stream.
    fn default() -> Self {
        Self {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl RNG {
    /// Create a new `RNG` seeded with the given sequence.
    ///
    /// * `seed` - The starting sequence to seed with.
    pub fn new(seed: u64) -> Self {
        let mut ret = Self { state: 0, inc: 0 };
        ret.set_sequence(seed);
        ret
    }

    /// Initialize the random number generator sequence.
    ///
    /// * `init_seq` - The starting sequence to seed with.
    fn set_sequence(&mut self, init_seq: u64) {
        self.state = 0;
        self.inc = init_seq.wrapping_shl(1) | 1;
        let _ = self.uniform_u32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        let _ = self.uniform_u32();
    }

    /// Returns a uniformly distributed u32 value.
    #[inline(always)]
    pub fn uniform_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);

        let xor_shifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xor_shifted.rotate_right(rot)
    }

    /// Returns a uniformly distributed value over the half open interval [0.0, 1.0).
    pub fn uniform_float(&mut self) -> Float {
        min(
            self.uniform_u32() as Float * hexf32!("0x1.0p-32"),
            ONE_MINUS_EPSILON,
        )
    }

    /// Returns a uniformly distributed value in `[lo, hi)`.
    ///
    /// * `lo` - Lower bound.
    /// * `hi` - Upper bound.
    pub fn uniform_range(&mut self, lo: Float, hi: Float) -> Float {
        lo + (hi - lo) * self.uniform_float()
    }

    /// Returns a uniformly distributed direction on the unit sphere.
    pub fn unit_vector(&mut self) -> Vector3f {
        let z = 1.0 - 2.0 * self.uniform_float();
        let r = (1.0 - z * z).max(0.0).sqrt();
        let phi = TWO_PI * self.uniform_float();
        vector3(r * phi.cos(), r * phi.sin(), z)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
