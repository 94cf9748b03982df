//! 3-D Axis Aligned Bounding Boxes.

use super::{point3, Interval, Point3f, Ray, Union, Vector3f};
use crate::base::{abs, max, min, Axis, Float, AXES, INFINITY};

/// Ray direction components smaller than this are treated as parallel to a
/// slab.
const PARALLEL_EPSILON: Float = 1e-8;

/// 3-D Axis Aligned Bounding Box containing `Float` points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum bounds.
    pub p_min: Point3f,

    /// Maximum bounds.
    pub p_max: Point3f,
}

impl Bounds3f {
    /// A box that contains nothing. Growing it by a point or box yields that
    /// point or box.
    pub const EMPTY: Bounds3f = Bounds3f {
        p_min: Point3f {
            x: INFINITY,
            y: INFINITY,
            z: INFINITY,
        },
        p_max: Point3f {
            x: -INFINITY,
            y: -INFINITY,
            z: -INFINITY,
        },
    };

    /// Creates a new 3-D bounding box from 2 points. The minimum and maximum
    /// bounds are used for each coordinate axis.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Creates a box from per-axis extents.
    ///
    /// * `x` - Extent along the x-axis.
    /// * `y` - Extent along the y-axis.
    /// * `z` - Extent along the z-axis.
    pub fn from_intervals(x: Interval, y: Interval, z: Interval) -> Self {
        Self {
            p_min: point3(x.min, y.min, z.min),
            p_max: point3(x.max, y.max, z.max),
        }
    }

    /// Returns the union of many bounding boxes.
    ///
    /// * `boxes` - The boxes.
    pub fn union_all<'a, I>(boxes: I) -> Self
    where
        I: IntoIterator<Item = &'a Bounds3f>,
    {
        boxes.into_iter().fold(Self::EMPTY, |acc, b| acc.union(b))
    }

    /// Returns the extent along an axis as an interval.
    ///
    /// * `axis` - The axis.
    pub fn axis_interval(&self, axis: Axis) -> Interval {
        Interval::new(self.p_min[axis], self.p_max[axis])
    }

    /// Returns true if the box is empty along any axis.
    pub fn is_empty(&self) -> bool {
        self.p_max.x < self.p_min.x || self.p_max.y < self.p_min.y || self.p_max.z < self.p_min.z
    }

    /// Returns the vector along the box diagonal from the minimum point to
    /// the maximum point.
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    /// Returns the surface area of the bounding box. Empty boxes have zero area.
    pub fn surface_area(&self) -> Float {
        if self.is_empty() {
            0.0
        } else {
            let d = self.diagonal();
            let h = d.x * d.y + d.x * d.z + d.y * d.z;
            h + h
        }
    }

    /// Returns the center of the box.
    pub fn centroid(&self) -> Point3f {
        self.p_min + self.diagonal() / 2.0
    }

    /// Returns the index of which of the axes is longest.
    pub fn maximum_extent(&self) -> Axis {
        self.diagonal().max_dimension()
    }

    /// Returns true if a point is inside the bounding box.
    ///
    /// * `p` - The point.
    pub fn contains(&self, p: &Point3f) -> bool {
        (p.x >= self.p_min.x && p.x <= self.p_max.x)
            && (p.y >= self.p_min.y && p.y <= self.p_max.y)
            && (p.z >= self.p_min.z && p.z <= self.p_max.z)
    }

    /// Returns true if the other box lies entirely inside this one.
    ///
    /// * `other` - The other box.
    pub fn contains_bounds(&self, other: &Bounds3f) -> bool {
        other.is_empty() || (self.contains(&other.p_min) && self.contains(&other.p_max))
    }

    /// Returns the coordinates of one of the eight corners.
    ///
    /// * `corner` - Corner index in `[0, 8)`; bit 0 selects x, bit 1 y and
    ///              bit 2 z.
    pub fn corner(&self, corner: u8) -> Point3f {
        debug_assert!(corner < 8);
        point3(
            if corner & 1 == 0 { self.p_min.x } else { self.p_max.x },
            if corner & 2 == 0 { self.p_min.y } else { self.p_max.y },
            if corner & 4 == 0 { self.p_min.z } else { self.p_max.z },
        )
    }

    /// Slab test. Returns the entry distance of the ray into the box clipped
    /// to `t_range`, or `None` if the ray misses the box within the range.
    ///
    /// * `r`       - The ray.
    /// * `t_range` - Valid ray parameters.
    pub fn intersect_p(&self, r: &Ray, t_range: &Interval) -> Option<Float> {
        let mut t = *t_range;
        for axis in AXES {
            let o = r.o[axis];
            let d = r.d[axis];
            let (lo, hi) = (self.p_min[axis], self.p_max[axis]);

            if abs(d) < PARALLEL_EPSILON {
                // Parallel to the slab so the origin must already be inside it.
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv_d = 1.0 / d;
            let (t0, t1) = if inv_d < 0.0 {
                ((hi - o) * inv_d, (lo - o) * inv_d)
            } else {
                ((lo - o) * inv_d, (hi - o) * inv_d)
            };

            t.min = max(t0, t.min);
            t.max = min(t1, t.max);
            if t.max < t.min {
                return None;
            }
        }
        Some(t.min)
    }
}

impl Default for Bounds3f {
    /// Returns the empty box.
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<Point3f> for Bounds3f {
    /// Use a 3-D point as minimum and maximum 3-D bounds.
    ///
    /// * `p` - 3-D point.
    fn from(p: Point3f) -> Self {
        Self { p_min: p, p_max: p }
    }
}

impl Union<Point3f> for Bounds3f {
    /// Return a bounding box containing the itself and a point.
    ///
    /// * `other` - The point.
    fn union(&self, other: &Point3f) -> Self {
        Self {
            p_min: self.p_min.min(other),
            p_max: self.p_max.max(other),
        }
    }
}

impl Union<Bounds3f> for Bounds3f {
    /// Return a bounding box containing both bounding boxes.
    ///
    /// * `other` - The other bounding box.
    fn union(&self, other: &Bounds3f) -> Self {
        if self.is_empty() {
            *other
        } else if other.is_empty() {
            *self
        } else {
            Self {
                p_min: self.p_min.min(&other.p_min),
                p_max: self.p_max.max(&other.p_max),
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
