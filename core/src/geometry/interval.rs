//! Closed scalar intervals used for ray parameter ranges and box extents.

use super::{Intersect, Union};
use crate::base::{max, min, Float, INFINITY};

/// Closed interval `[min, max]`. The interval is empty when `min > max`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    /// Lower bound.
    pub min: Float,

    /// Upper bound.
    pub max: Float,
}

impl Interval {
    /// An interval that contains nothing.
    pub const EMPTY: Interval = Interval {
        min: INFINITY,
        max: -INFINITY,
    };

    /// An interval that contains every value.
    pub const UNIVERSE: Interval = Interval {
        min: -INFINITY,
        max: INFINITY,
    };

    /// Create a new interval.
    ///
    /// * `min` - Lower bound.
    /// * `max` - Upper bound.
    pub const fn new(min: Float, max: Float) -> Self {
        Self { min, max }
    }

    /// Returns true if `min > max`.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns the width of the interval.
    pub fn size(&self) -> Float {
        self.max - self.min
    }

    /// Returns true if `x` lies in the closed interval.
    ///
    /// * `x` - The value.
    pub fn contains(&self, x: Float) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if `x` lies strictly inside the interval.
    ///
    /// * `x` - The value.
    pub fn surrounds(&self, x: Float) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps `x` to the interval.
    ///
    /// * `x` - The value.
    pub fn clamp(&self, x: Float) -> Float {
        max(self.min, min(x, self.max))
    }

    /// Pads both ends of the interval by `delta / 2`.
    ///
    /// * `delta` - Total padding.
    pub fn expand(&self, delta: Float) -> Self {
        let padding = delta / 2.0;
        Self::new(self.min - padding, self.max + padding)
    }

    /// Returns the interval with the upper bound replaced.
    ///
    /// * `max` - New upper bound.
    pub fn with_max(&self, max: Float) -> Self {
        Self::new(self.min, max)
    }
}

impl Default for Interval {
    /// Returns the empty interval.
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Union<Interval> for Interval {
    /// Smallest interval containing both intervals. An empty operand leaves
    /// the other unchanged.
    ///
    /// * `other` - The other interval.
    fn union(&self, other: &Interval) -> Self {
        if self.is_empty() {
            *other
        } else if other.is_empty() {
            *self
        } else {
            Self::new(min(self.min, other.min), max(self.max, other.max))
        }
    }
}

impl Union<Float> for Interval {
    /// Grow the interval to include a value.
    ///
    /// * `other` - The value.
    fn union(&self, other: &Float) -> Self {
        self.union(&Interval::new(*other, *other))
    }
}

impl Intersect<Interval> for Interval {
    /// Overlap of both intervals; empty if they are disjoint.
    ///
    /// * `other` - The other interval.
    fn intersect(&self, other: &Interval) -> Self {
        Self::new(max(self.min, other.min), min(self.max, other.max))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn interval_f32()(a in -100.0..100.0f32, b in -100.0..100.0f32) -> Interval {
            Interval::new(a.min(b), a.max(b))
        }
    }

    #[test]
    fn empty_and_universe() {
        assert!(Interval::EMPTY.is_empty());
        assert!(!Interval::UNIVERSE.is_empty());
        assert!(Interval::UNIVERSE.contains(1e30));
        assert!(!Interval::EMPTY.contains(0.0));
    }

    #[test]
    fn surrounds_excludes_end_points() {
        let i = Interval::new(0.0, 1.0);
        assert!(i.contains(1.0));
        assert!(!i.surrounds(1.0));
        assert!(i.surrounds(0.5));
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(2.0, 3.0);
        assert!(a.intersect(&b).is_empty());
    }

    proptest! {
        #[test]
        fn union_commutative(a in interval_f32(), b in interval_f32()) {
            prop_assert_eq!(a.union(&b), b.union(&a));
        }

        #[test]
        fn union_associative(a in interval_f32(), b in interval_f32(), c in interval_f32()) {
            prop_assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));
        }

        #[test]
        fn intersect_commutative(a in interval_f32(), b in interval_f32()) {
            prop_assert_eq!(a.intersect(&b), b.intersect(&a));
        }

        #[test]
        fn intersect_associative(a in interval_f32(), b in interval_f32(), c in interval_f32()) {
            prop_assert_eq!(a.intersect(&b).intersect(&c), a.intersect(&b.intersect(&c)));
        }

        #[test]
        fn union_with_empty_is_identity(a in interval_f32()) {
            prop_assert_eq!(a.union(&Interval::EMPTY), a);
            prop_assert_eq!(Interval::EMPTY.union(&a), a);
        }
    }
}
