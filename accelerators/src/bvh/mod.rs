//! Bounding Volume Hierarchy.

use radiotrace_core::base::*;
use radiotrace_core::geometry::*;
use radiotrace_core::interaction::*;
use radiotrace_core::primitive::*;

mod common;
mod sah;

pub use common::*;

/// Bottom level Bounding Volume Hierarchy over the primitives of one object.
/// Nodes live in a flat array with the root at index 0; the primitives stay
/// in place and are reordered through `prim_indices`.
#[derive(Clone)]
pub struct BVH<P: Primitive> {
    /// The primitives.
    primitives: Vec<P>,

    /// Primitive indices; each leaf owns a contiguous slice.
    prim_indices: Vec<usize>,

    /// The list of nodes.
    nodes: Vec<BVHNode>,

    /// Number of SAH bins per axis.
    num_bins: usize,
}

impl<P: Primitive> BVH<P> {
    /// Create a new Bounding Volume Hierarchy using the default bin count.
    ///
    /// * `primitives` - The primitives.
    pub fn new(primitives: Vec<P>) -> Self {
        Self::with_bins(primitives, DEFAULT_BINS)
    }

    /// Create a new Bounding Volume Hierarchy.
    ///
    /// * `primitives` - The primitives.
    /// * `num_bins`   - Number of SAH bins per axis; at least 2.
    pub fn with_bins(primitives: Vec<P>, num_bins: usize) -> Self {
        let num_bins = if num_bins < 2 {
            warn!("BVH bin count {} too small. Using 2.", num_bins);
            2
        } else {
            num_bins
        };

        let n_primitives = primitives.len();
        if n_primitives == 0 {
            warn!("BVH created without primitives; it will never report a hit");
            return Self {
                primitives,
                prim_indices: vec![],
                nodes: vec![],
                num_bins,
            };
        }

        let prim_bounds: Vec<Bounds3f> = primitives.iter().map(|p| p.world_bound()).collect();
        let centroids: Vec<Point3f> = primitives.iter().map(|p| p.centroid()).collect();
        let mut prim_indices: Vec<usize> = (0..n_primitives).collect();

        let mut stats = BuildStats::default();
        let nodes = sah::build(&prim_bounds, &centroids, &mut prim_indices, num_bins, &mut stats);

        info!(
            "BVH created with {} nodes ({} leaves, depth {}) for {} primitives ({:.2} MB)",
            nodes.len(),
            stats.leaf_nodes,
            stats.max_depth,
            n_primitives,
            (nodes.len() * std::mem::size_of::<BVHNode>()) as f32 / (1024.0 * 1024.0),
        );

        Self {
            primitives,
            prim_indices,
            nodes,
            num_bins,
        }
    }

    /// Returns the primitives in their original order.
    pub fn primitives(&self) -> &[P] {
        &self.primitives
    }

    /// Returns the primitives for in place edits. Call `refit()` afterwards
    /// so that the node bounds contain the moved geometry again.
    pub fn primitives_mut(&mut self) -> &mut [P] {
        &mut self.primitives
    }

    /// Returns the flat node array.
    pub fn nodes(&self) -> &[BVHNode] {
        &self.nodes
    }

    /// Returns the permuted primitive indices.
    pub fn prim_indices(&self) -> &[usize] {
        &self.prim_indices
    }

    /// Returns the number of SAH bins per axis.
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Returns true if the hierarchy holds no primitives.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Recompute all node bounds bottom-up without changing the tree
    /// topology. Children are always stored after their parent so a reverse
    /// sweep visits them first.
    pub fn refit(&mut self) {
        for i in (0..self.nodes.len()).rev() {
            let node = self.nodes[i];
            let bounds = if node.is_leaf() {
                let first = node.left_first as usize;
                self.prim_indices[first..first + node.prim_count as usize]
                    .iter()
                    .fold(Bounds3f::EMPTY, |b, &p| b.union(&self.primitives[p].world_bound()))
            } else {
                let left = node.left_first as usize;
                self.nodes[left].bounds.union(&self.nodes[left + 1].bounds)
            };
            self.nodes[i].bounds = bounds;
        }
    }
}

impl<P: Primitive> Primitive for BVH<P> {
    /// Returns a bounding box in the world space.
    fn world_bound(&self) -> Bounds3f {
        self.nodes.first().map_or(Bounds3f::EMPTY, |root| root.bounds)
    }

    /// Returns the nearest intersection within `t_range`. Children are
    /// visited nearest first and the upper end of the range shrinks to the
    /// closest hit so far.
    ///
    /// * `r`       - The ray.
    /// * `t_range` - Valid ray parameters.
    fn intersect(&self, r: &Ray, t_range: &Interval) -> Option<SurfaceInteraction> {
        let root = self.nodes.first()?;
        root.bounds.intersect_p(r, t_range)?;

        let mut t_range = *t_range;
        let mut si: Option<SurfaceInteraction> = None;

        let mut nodes_to_visit = [(0_usize, 0.0 as Float); MAX_STACK_DEPTH];
        let mut to_visit_offset = 0;
        let mut current_node_index = 0;

        loop {
            let node = &self.nodes[current_node_index];
            let mut next = None;

            if node.is_leaf() {
                // Intersect ray with primitives in leaf BVH node.
                let first = node.left_first as usize;
                for &i in &self.prim_indices[first..first + node.prim_count as usize] {
                    if let Some(hit) = self.primitives[i].intersect(r, &t_range) {
                        t_range.max = hit.t;
                        si = Some(hit);
                    }
                }
            } else {
                let left = node.left_first as usize;
                let right = left + 1;
                let t_left = self.nodes[left].bounds.intersect_p(r, &t_range);
                let t_right = self.nodes[right].bounds.intersect_p(r, &t_range);

                next = match (t_left, t_right) {
                    (Some(tl), Some(tr)) => {
                        // Put far node on the stack, advance to near node.
                        let (near, far, t_far) = if tl <= tr {
                            (left, right, tr)
                        } else {
                            (right, left, tl)
                        };
                        nodes_to_visit[to_visit_offset] = (far, t_far);
                        to_visit_offset += 1;
                        Some(near)
                    }
                    (Some(_), None) => Some(left),
                    (None, Some(_)) => Some(right),
                    (None, None) => None,
                };
            }

            current_node_index = match next {
                Some(n) => n,
                None => {
                    // Pop the next node that can still hold a closer hit.
                    let mut popped = None;
                    while to_visit_offset > 0 {
                        to_visit_offset -= 1;
                        let (n, t_entry) = nodes_to_visit[to_visit_offset];
                        if t_entry <= t_range.max {
                            popped = Some(n);
                            break;
                        }
                    }
                    match popped {
                        Some(n) => n,
                        None => break,
                    }
                }
            };
        }

        si
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
    use radiotrace_core::rng::RNG;
    use shapes::Triangle;

    fn random_point(rng: &mut RNG, extent: Float) -> Point3f {
        point3(
            rng.uniform_range(-extent, extent),
            rng.uniform_range(-extent, extent),
            rng.uniform_range(-extent, extent),
        )
    }

    fn random_triangles(rng: &mut RNG, n: usize) -> Vec<Triangle> {
        (0..n)
            .map(|i| {
                let a = random_point(rng, 10.0);
                let b = a + rng.unit_vector() * rng.uniform_range(0.2, 2.0);
                let c = a + rng.unit_vector() * rng.uniform_range(0.2, 2.0);
                Triangle::new(a, b, c, None, i)
            })
            .collect()
    }

    fn brute_force(tris: &[Triangle], r: &Ray, t_range: &Interval) -> Option<SurfaceInteraction> {
        let mut t_range = *t_range;
        let mut si = None;
        for tri in tris {
            if let Some(hit) = tri.intersect(r, &t_range) {
                t_range.max = hit.t;
                si = Some(hit);
            }
        }
        si
    }

    #[test]
    fn empty_bvh_never_hits() {
        let bvh: BVH<Triangle> = BVH::new(vec![]);
        assert!(bvh.is_empty());
        assert!(bvh.world_bound().is_empty());
        let r = Ray::new(point3(0.0, 0.0, 0.0), vector3(0.0, 0.0, 1.0));
        assert!(bvh.intersect(&r, &Interval::new(0.0, INFINITY)).is_none());
    }

    #[test]
    fn single_triangle() {
        let tri = Triangle::new(
            point3(0.0, 0.0, 0.0),
            point3(1.0, 0.0, 0.0),
            point3(0.0, 1.0, 0.0),
            None,
            0,
        );
        let bvh = BVH::new(vec![tri]);
        assert_eq!(bvh.nodes().len(), 1);

        let r = Ray::new(point3(0.0, 0.0, 1.0), vector3(0.0, 0.0, -1.0));
        let si = bvh.intersect(&r, &Interval::new(0.0, INFINITY)).unwrap();
        assert!(approx_eq!(f32, si.t, 1.0));
        assert_eq!(si.triangle.primitive, 0);

        let away = Ray::new(point3(0.0, 0.0, 1.0), vector3(0.0, 0.0, 1.0));
        assert!(bvh.intersect(&away, &Interval::new(0.0, INFINITY)).is_none());
    }

    #[test]
    fn matches_brute_force() {
        let mut rng = RNG::new(7);
        let tris = random_triangles(&mut rng, 500);
        let bvh = BVH::with_bins(tris.clone(), 16);
        assert!(bvh.nodes().len() > 1);

        let t_range = Interval::new(0.0, INFINITY);
        let mut hits = 0;
        for _ in 0..2000 {
            let o = random_point(&mut rng, 15.0);
            let target = random_point(&mut rng, 8.0);
            let r = Ray::new(o, (target - o).normalize());

            let expected = brute_force(&tris, &r, &t_range);
            let actual = bvh.intersect(&r, &t_range);
            match (expected, actual) {
                (Some(e), Some(a)) => {
                    hits += 1;
                    assert!(approx_eq!(f32, e.t, a.t, epsilon = 1e-5), "{} vs {}", e.t, a.t);
                    assert!(e.p.distance(&a.p) < 1e-4);
                }
                (None, None) => {}
                (e, a) => panic!("brute force {:?} vs bvh {:?}", e.map(|s| s.t), a.map(|s| s.t)),
            }
        }
        assert!(hits > 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn any_scene_matches_brute_force(
            seed in 0u64..10_000,
            n in 1usize..120,
            bins in 2usize..48,
        ) {
            let mut rng = RNG::new(seed);
            let tris = random_triangles(&mut rng, n);
            let bvh = BVH::with_bins(tris.clone(), bins);
            prop_assert!(!bvh.world_bound().is_empty());

            let t_range = Interval::new(0.0, INFINITY);
            for _ in 0..32 {
                let o = random_point(&mut rng, 15.0);
                let target = random_point(&mut rng, 8.0);
                let r = Ray::new(o, (target - o).normalize());

                let expected = brute_force(&tris, &r, &t_range).map(|si| si.t);
                let actual = bvh.intersect(&r, &t_range).map(|si| si.t);
                prop_assert_eq!(expected.is_some(), actual.is_some());
                if let (Some(e), Some(a)) = (expected, actual) {
                    prop_assert!(approx_eq!(f32, e, a, epsilon = 1e-5), "{} vs {}", e, a);
                }
            }
        }
    }

    #[test]
    fn node_bounds_contain_primitives() {
        let mut rng = RNG::new(3);
        let bvh = BVH::new(random_triangles(&mut rng, 200));
        for node in bvh.nodes() {
            if node.is_leaf() {
                let first = node.left_first as usize;
                for &i in &bvh.prim_indices()[first..first + node.prim_count as usize] {
                    assert!(node.bounds.contains_bounds(&bvh.primitives()[i].world_bound()));
                }
            } else {
                let left = &bvh.nodes()[node.left_first as usize];
                let right = &bvh.nodes()[node.left_first as usize + 1];
                assert_eq!(node.bounds, left.bounds.union(&right.bounds));
            }
        }
    }

    #[test]
    fn refit_after_moving_geometry() {
        let mut rng = RNG::new(11);
        let mut bvh = BVH::new(random_triangles(&mut rng, 64));
        let offset = vector3(100.0, 0.0, 0.0);
        for tri in bvh.primitives_mut() {
            *tri = Triangle::new(tri.a + offset, tri.b + offset, tri.c + offset, None, tri.index);
        }
        bvh.refit();

        for node in bvh.nodes() {
            if node.is_leaf() {
                let first = node.left_first as usize;
                for &i in &bvh.prim_indices()[first..first + node.prim_count as usize] {
                    assert!(node.bounds.contains_bounds(&bvh.primitives()[i].world_bound()));
                }
            }
        }

        let tri = &bvh.primitives()[0];
        let n = Vector3f::from(tri.n);
        let r = Ray::new(tri.centroid + n * 50.0, -n);
        let si = bvh.intersect(&r, &Interval::new(0.0, INFINITY));
        assert!(si.is_some());
    }
}
