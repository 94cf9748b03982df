//! Coverage map: received signal strength sampled on a horizontal grid.

use crate::base::{Float, INFINITY};
use crate::error::TracerError;
use crate::geometry::*;
use crate::propagation::mw_to_dbm;

/// A horizontal rectangle in the x-z plane at a fixed height.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoveragePlane {
    /// Corner with the smallest x and z coordinates; `y` is the height.
    pub corner: Point3f,

    /// Extent along the x-axis.
    pub size_x: Float,

    /// Extent along the z-axis.
    pub size_z: Float,
}

impl CoveragePlane {
    /// Create a new plane.
    ///
    /// * `corner` - Corner with the smallest x and z coordinates.
    /// * `size_x` - Extent along the x-axis.
    /// * `size_z` - Extent along the z-axis.
    pub fn new(corner: Point3f, size_x: Float, size_z: Float) -> Self {
        Self {
            corner,
            size_x,
            size_z,
        }
    }

    /// Derive a plane from scene bounds. The plane sits `height` above the
    /// lowest point of the scene and covers `margin` times the scene extent
    /// around its center.
    ///
    /// * `bounds` - Scene bounds.
    /// * `height` - Height above the lowest point.
    /// * `margin` - Scale applied to the horizontal extent.
    pub fn from_bounds(bounds: &Bounds3f, height: Float, margin: Float) -> Self {
        let c = bounds.centroid();
        let d = bounds.diagonal();
        let (size_x, size_z) = (d.x * margin, d.z * margin);
        Self {
            corner: point3(c.x - 0.5 * size_x, bounds.p_min.y + height, c.z - 0.5 * size_z),
            size_x,
            size_z,
        }
    }

    /// Returns the plane height.
    pub fn height(&self) -> Float {
        self.corner.y
    }

    /// Returns the edge vectors spanning the plane from its corner.
    pub fn edges(&self) -> (Vector3f, Vector3f) {
        (vector3(self.size_x, 0.0, 0.0), vector3(0.0, 0.0, self.size_z))
    }
}

/// A single sample cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoverageCell {
    /// Cell center on the plane.
    pub center: Point3f,

    /// Accumulated received power in mW.
    pub strength: Float,

    /// Number of ray hits.
    pub hits: u32,

    /// Received power in dBm; negative infinity until converted or when the
    /// cell received nothing.
    pub strength_db: Float,
}

/// Grid of cells covering a `CoveragePlane`.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverageMap {
    /// Plane covered by the grid.
    pub plane: CoveragePlane,

    /// Cell edge length.
    pub cell_size: Float,

    /// Number of cells along the x-axis.
    pub nx: usize,

    /// Number of cells along the z-axis.
    pub nz: usize,

    /// Cells in row-major order (`iz * nx + ix`).
    pub cells: Vec<CoverageCell>,
}

impl CoverageMap {
    /// Create an empty grid over a plane.
    ///
    /// * `plane`     - The plane.
    /// * `cell_size` - Cell edge length.
    pub fn new(plane: CoveragePlane, cell_size: Float) -> Result<Self, TracerError> {
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return Err(TracerError::InvalidSettings(format!(
                "cell size must be positive, got {}",
                cell_size
            )));
        }
        if !(plane.size_x >= 0.0 && plane.size_z >= 0.0) {
            return Err(TracerError::InvalidSettings(format!(
                "coverage plane must have a non-negative size, got {} x {}",
                plane.size_x, plane.size_z
            )));
        }

        let nx = ((plane.size_x / cell_size).ceil() as usize).max(1);
        let nz = ((plane.size_z / cell_size).ceil() as usize).max(1);

        let cells = (0..nz)
            .flat_map(|iz| (0..nx).map(move |ix| (ix, iz)))
            .map(|(ix, iz)| CoverageCell {
                center: point3(
                    plane.corner.x + (ix as Float + 0.5) * cell_size,
                    plane.corner.y,
                    plane.corner.z + (iz as Float + 0.5) * cell_size,
                ),
                strength: 0.0,
                hits: 0,
                strength_db: -INFINITY,
            })
            .collect();

        Ok(Self {
            plane,
            cell_size,
            nx,
            nz,
            cells,
        })
    }

    /// Returns a grid with the same layout and every cell cleared.
    pub fn cleared(&self) -> Self {
        let mut map = self.clone();
        for cell in map.cells.iter_mut() {
            cell.strength = 0.0;
            cell.hits = 0;
            cell.strength_db = -INFINITY;
        }
        map
    }

    /// Returns the index of the cell containing a point on the plane, or
    /// `None` if the point lies outside the grid.
    ///
    /// * `p` - The point.
    pub fn cell_index(&self, p: &Point3f) -> Option<usize> {
        let fx = ((p.x - self.plane.corner.x) / self.cell_size).floor();
        let fz = ((p.z - self.plane.corner.z) / self.cell_size).floor();
        if fx < 0.0 || fz < 0.0 || !fx.is_finite() || !fz.is_finite() {
            return None;
        }
        let (ix, iz) = (fx as usize, fz as usize);
        if ix < self.nx && iz < self.nz {
            Some(iz * self.nx + ix)
        } else {
            None
        }
    }

    /// Returns the cell at grid coordinates.
    ///
    /// * `ix` - Column.
    /// * `iz` - Row.
    pub fn cell(&self, ix: usize, iz: usize) -> &CoverageCell {
        &self.cells[iz * self.nx + ix]
    }

    /// Add received power to the cell containing `p`. Returns false if `p` is
    /// outside the grid.
    ///
    /// * `p`     - Point on the plane.
    /// * `power` - Received power in mW.
    pub fn accumulate(&mut self, p: &Point3f, power: Float) -> bool {
        match self.cell_index(p) {
            Some(i) => {
                let cell = &mut self.cells[i];
                cell.strength += power;
                cell.hits += 1;
                true
            }
            None => false,
        }
    }

    /// Add the contents of a grid with the same layout.
    ///
    /// * `other` - The other grid.
    pub fn merge(&mut self, other: &CoverageMap) {
        debug_assert!(self.nx == other.nx && self.nz == other.nz);
        for (cell, o) in self.cells.iter_mut().zip(other.cells.iter()) {
            cell.strength += o.strength;
            cell.hits += o.hits;
        }
    }

    /// Convert accumulated power to dBm. Cells that received nothing stay at
    /// negative infinity.
    pub fn convert_to_db(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.strength_db = if cell.strength > 0.0 {
                mw_to_dbm(cell.strength)
            } else {
                -INFINITY
            };
        }
    }

    /// Returns the smallest and largest finite dB values, or `None` if no
    /// cell received anything.
    pub fn db_range(&self) -> Option<(Float, Float)> {
        self.cells
            .iter()
            .map(|c| c.strength_db)
            .filter(|db| db.is_finite())
            .fold(None, |acc, db| match acc {
                None => Some((db, db)),
                Some((lo, hi)) => Some((lo.min(db), hi.max(db))),
            })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn plane() -> CoveragePlane {
        CoveragePlane::new(point3(-5.0, 1.0, -5.0), 10.0, 10.0)
    }

    #[test]
    fn grid_dimensions_round_up() {
        let map = CoverageMap::new(CoveragePlane::new(point3(0.0, 0.0, 0.0), 10.0, 4.5), 1.0)
            .unwrap();
        assert_eq!(map.nx, 10);
        assert_eq!(map.nz, 5);
        assert_eq!(map.cells.len(), 50);
        assert_eq!(map.cell(2, 3).center, point3(2.5, 0.0, 3.5));
    }

    #[test]
    fn invalid_cell_size() {
        assert!(CoverageMap::new(plane(), 0.0).is_err());
        assert!(CoverageMap::new(plane(), -1.0).is_err());
        assert!(CoverageMap::new(plane(), Float::NAN).is_err());
    }

    #[test]
    fn lookup_floors_coordinates() {
        let map = CoverageMap::new(plane(), 1.0).unwrap();
        assert_eq!(map.cell_index(&point3(-5.0, 1.0, -5.0)), Some(0));
        assert_eq!(map.cell_index(&point3(-4.01, 1.0, -3.5)), Some(10));
        assert_eq!(map.cell_index(&point3(-5.5, 1.0, 0.0)), None);
        assert_eq!(map.cell_index(&point3(5.0, 1.0, 0.0)), None);
    }

    #[test]
    fn empty_cells_are_negative_infinity() {
        let mut map = CoverageMap::new(plane(), 1.0).unwrap();
        assert!(map.accumulate(&point3(0.5, 1.0, 0.5), 10.0));
        assert!(!map.accumulate(&point3(50.0, 1.0, 0.5), 10.0));
        map.convert_to_db();
        let i = map.cell_index(&point3(0.5, 1.0, 0.5)).unwrap();
        assert!(approx_eq!(f32, map.cells[i].strength_db, 10.0, epsilon = 1e-5));
        assert_eq!(map.cells[0].strength_db, -INFINITY);
        assert_eq!(map.db_range(), Some((map.cells[i].strength_db, map.cells[i].strength_db)));
    }

    #[test]
    fn plane_from_bounds() {
        let b = Bounds3f::new(point3(-1.0, 2.0, -2.0), point3(1.0, 5.0, 2.0));
        let p = CoveragePlane::from_bounds(&b, 1.5, 3.0);
        assert_eq!(p.corner, point3(-3.0, 3.5, -6.0));
        assert_eq!(p.size_x, 6.0);
        assert_eq!(p.size_z, 12.0);
    }

    proptest! {
        #[test]
        fn merge_adds_cellwise(
            xs in prop::collection::vec((-5.0..5.0f32, -5.0..5.0f32, 0.0..10.0f32), 0..50)
        ) {
            let mut all = CoverageMap::new(plane(), 0.5).unwrap();
            let mut a = all.cleared();
            let mut b = all.cleared();
            for (k, (x, z, w)) in xs.iter().enumerate() {
                let p = point3(*x, 1.0, *z);
                all.accumulate(&p, *w);
                if k % 2 == 0 { a.accumulate(&p, *w); } else { b.accumulate(&p, *w); }
            }
            a.merge(&b);
            for (c0, c1) in all.cells.iter().zip(a.cells.iter()) {
                prop_assert_eq!(c0.hits, c1.hits);
                prop_assert!(approx_eq!(f32, c0.strength, c1.strength, epsilon = 1e-3));
            }
        }
    }
}
