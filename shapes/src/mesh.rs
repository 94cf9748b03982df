//! Triangle meshes

use crate::triangle::*;
use radiotrace_core::base::*;
use radiotrace_core::error::*;
use radiotrace_core::geometry::*;
use radiotrace_core::material::*;
use std::fmt;

/// Indexed triangle mesh as supplied by a model loader: vertex positions and
/// three indices per triangle. All triangles share one material.
#[derive(Clone)]
pub struct TriangleMesh {
    /// Mesh name used in log and error messages.
    pub name: String,

    /// Vertex positions.
    pub positions: Vec<Point3f>,

    /// Vertex indices. For the ith triangle, its three vertex positions are
    /// positions[indices[3 * i]], positions[indices[3 * i + 1]] and
    /// positions[indices[3 * i + 2]].
    pub indices: Vec<usize>,

    /// Shared material.
    pub material: Option<ArcMaterial>,
}

impl TriangleMesh {
    /// Create a new triangle mesh after validating the index buffer.
    ///
    /// * `name`      - Mesh name.
    /// * `positions` - Vertex positions.
    /// * `indices`   - Vertex indices, three per triangle.
    /// * `material`  - Shared material.
    pub fn new(
        name: &str,
        positions: Vec<Point3f>,
        indices: Vec<usize>,
        material: Option<ArcMaterial>,
    ) -> Result<Self, TracerError> {
        let mesh = Self {
            name: name.to_string(),
            positions,
            indices,
            material,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Check that the index buffer describes whole triangles referencing
    /// existing vertices and that all vertices are numbers.
    pub fn validate(&self) -> Result<(), TracerError> {
        let invalid = |reason: String| TracerError::InvalidMesh {
            mesh: self.name.clone(),
            reason,
        };

        if self.indices.len() % 3 != 0 {
            return Err(invalid(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if let Some(i) = self.indices.iter().find(|&&i| i >= self.positions.len()) {
            return Err(invalid(format!(
                "index {} out of range for {} vertices",
                i,
                self.positions.len()
            )));
        }
        if let Some(p) = self.positions.iter().find(|p| p.has_nans()) {
            return Err(invalid(format!("vertex {:?} is not a number", p)));
        }
        Ok(())
    }

    /// Create a mesh from a flat triangle list where every three consecutive
    /// positions form one triangle.
    ///
    /// * `name`      - Mesh name.
    /// * `vertices`  - Triangle vertices.
    /// * `material`  - Shared material.
    pub fn from_triangle_list(
        name: &str,
        vertices: Vec<Point3f>,
        material: Option<ArcMaterial>,
    ) -> Result<Self, TracerError> {
        let indices = (0..vertices.len()).collect();
        Self::new(name, vertices, indices, material)
    }

    /// Create an axis aligned box with outward facing triangles.
    ///
    /// * `name`     - Mesh name.
    /// * `p_min`    - Minimum corner.
    /// * `p_max`    - Maximum corner.
    /// * `material` - Shared material.
    pub fn cuboid(
        name: &str,
        p_min: Point3f,
        p_max: Point3f,
        material: Option<ArcMaterial>,
    ) -> Result<Self, TracerError> {
        let b = Bounds3f::new(p_min, p_max);
        let positions: Vec<Point3f> = (0..8).map(|i| b.corner(i)).collect();

        // Corner bits: 1 = +x, 2 = +y, 4 = +z.
        #[rustfmt::skip]
        let indices = vec![
            0, 4, 6,  0, 6, 2, // -x
            1, 3, 7,  1, 7, 5, // +x
            0, 1, 5,  0, 5, 4, // -y
            2, 6, 7,  2, 7, 3, // +y
            0, 2, 3,  0, 3, 1, // -z
            4, 5, 7,  4, 7, 6, // +z
        ];
        Self::new(name, positions, indices, material)
    }

    /// Create a horizontal rectangle at height `y` facing up.
    ///
    /// * `name`     - Mesh name.
    /// * `p_min`    - Corner with the smallest x and z.
    /// * `p_max`    - Corner with the largest x and z.
    /// * `y`        - Height.
    /// * `material` - Shared material.
    pub fn ground(
        name: &str,
        p_min: (Float, Float),
        p_max: (Float, Float),
        y: Float,
        material: Option<ArcMaterial>,
    ) -> Result<Self, TracerError> {
        let positions = vec![
            point3(p_min.0, y, p_min.1),
            point3(p_max.0, y, p_min.1),
            point3(p_max.0, y, p_max.1),
            point3(p_min.0, y, p_max.1),
        ];
        Self::new(name, positions, vec![0, 2, 1, 0, 3, 2], material)
    }

    /// Returns the number of triangles.
    pub fn n_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the bounds of all referenced vertices.
    pub fn bounds(&self) -> Bounds3f {
        self.indices
            .iter()
            .fold(Bounds3f::EMPTY, |b, &i| b.union(&self.positions[i]))
    }

    /// Expand the index buffer into triangles. Degenerate triangles are kept
    /// so that indices stay aligned with the index buffer; they never report
    /// a hit.
    pub fn triangles(&self) -> Vec<Triangle> {
        let triangles: Vec<Triangle> = self
            .indices
            .chunks_exact(3)
            .enumerate()
            .map(|(i, v)| {
                Triangle::new(
                    self.positions[v[0]],
                    self.positions[v[1]],
                    self.positions[v[2]],
                    self.material.clone(),
                    i,
                )
            })
            .collect();

        let degenerate = triangles.iter().filter(|t| t.is_degenerate()).count();
        if degenerate > 0 {
            warn!("Mesh '{}' has {} degenerate triangles", self.name, degenerate);
        }
        triangles
    }
}

impl fmt::Debug for TriangleMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriangleMesh")
            .field("name", &self.name)
            .field("vertices", &self.positions.len())
            .field("triangles", &self.n_triangles())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use radiotrace_core::primitive::Primitive;

    #[test]
    fn rejects_bad_index_count() {
        let r = TriangleMesh::new("m", vec![point3(0.0, 0.0, 0.0); 3], vec![0, 1], None);
        assert!(matches!(r, Err(TracerError::InvalidMesh { .. })));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let r = TriangleMesh::new("m", vec![point3(0.0, 0.0, 0.0); 3], vec![0, 1, 3], None);
        assert!(matches!(r, Err(TracerError::InvalidMesh { .. })));
    }

    #[test]
    fn rejects_nan_vertex() {
        let r = TriangleMesh::new(
            "m",
            vec![point3(0.0, Float::NAN, 0.0), point3(1.0, 0.0, 0.0), point3(0.0, 1.0, 0.0)],
            vec![0, 1, 2],
            None,
        );
        assert!(r.is_err());
    }

    #[test]
    fn triangle_list() {
        let m = TriangleMesh::from_triangle_list(
            "tri",
            vec![point3(0.0, 0.0, 0.0), point3(1.0, 0.0, 0.0), point3(0.0, 1.0, 0.0)],
            None,
        )
        .unwrap();
        assert_eq!(m.n_triangles(), 1);
        assert_eq!(m.triangles()[0].index, 0);
    }

    #[test]
    fn cuboid_normals_point_outward() {
        let m = TriangleMesh::cuboid("box", point3(-1.0, 0.0, -1.0), point3(1.0, 4.0, 1.0), None)
            .unwrap();
        assert_eq!(m.n_triangles(), 12);
        let center = m.bounds().centroid();
        for t in m.triangles() {
            let out = t.centroid() - center;
            assert!(t.n.dot(&out) > 0.0, "triangle {} faces inward", t.index);
        }
    }

    #[test]
    fn ground_faces_up() {
        let m = TriangleMesh::ground("ground", (-10.0, -10.0), (10.0, 10.0), 0.0, None).unwrap();
        for t in m.triangles() {
            assert!(t.n.y > 0.99);
        }
        let b = m.bounds();
        assert_eq!(b.p_min, point3(-10.0, 0.0, -10.0));
        assert_eq!(b.p_max, point3(10.0, 0.0, 10.0));
    }
}
