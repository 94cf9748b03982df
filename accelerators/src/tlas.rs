//! Top Level Acceleration Structure.

use crate::instance::*;
use radiotrace_core::base::Float;
use radiotrace_core::error::*;
use radiotrace_core::geometry::*;
use radiotrace_core::interaction::*;
use radiotrace_core::primitive::*;

/// Largest instance count whose node indices fit the packed 16-bit children.
pub const MAX_INSTANCES: usize = 32767;

/// A node of the top level tree.
#[derive(Copy, Clone, Debug)]
pub struct TLASNode {
    /// World space bounds.
    pub bounds: Bounds3f,

    /// Left child in the low 16 bits and right child in the high 16 bits.
    /// Zero for leaves.
    pub left_right: u32,

    /// For leaves, index of the instance.
    pub blas: u32,
}

impl Default for TLASNode {
    /// Returns the "default value" for `TLASNode`.
    fn default() -> Self {
        Self {
            bounds: Bounds3f::EMPTY,
            left_right: 0,
            blas: 0,
        }
    }
}

impl TLASNode {
    /// Returns true for leaves.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left_right == 0
    }

    /// Returns the left child index.
    #[inline]
    pub fn left(&self) -> usize {
        (self.left_right & 0xffff) as usize
    }

    /// Returns the right child index.
    #[inline]
    pub fn right(&self) -> usize {
        (self.left_right >> 16) as usize
    }
}

/// Binary tree over BVH instances built by greedy agglomerative clustering.
/// The root is node 0, the leaves are nodes `1..=N` and the interior nodes
/// follow them.
#[derive(Clone)]
pub struct TLAS<P: Primitive> {
    /// The instances.
    instances: Vec<BVHInstance<P>>,

    /// The list of nodes.
    nodes: Vec<TLASNode>,
}

impl<P: Primitive> TLAS<P> {
    /// Build the tree over the given instances.
    ///
    /// * `instances` - The instances.
    pub fn new(instances: Vec<BVHInstance<P>>) -> Result<Self, TracerError> {
        let n = instances.len();
        if n > MAX_INSTANCES {
            return Err(TracerError::TooManyInstances(n));
        }
        if n == 0 {
            warn!("TLAS created without instances; it will never report a hit");
            return Ok(Self {
                instances,
                nodes: vec![],
            });
        }

        let mut nodes = vec![TLASNode::default(); 2 * n];
        let mut node_idx: Vec<usize> = Vec::with_capacity(n);
        for (i, instance) in instances.iter().enumerate() {
            nodes[i + 1] = TLASNode {
                bounds: instance.world_bound(),
                left_right: 0,
                blas: i as u32,
            };
            node_idx.push(i + 1);
        }
        let mut nodes_used = n + 1;

        // Merge mutual best matches until a single cluster remains.
        let mut n_active = n;
        let mut a = 0;
        let mut b = find_best_match(&nodes, &node_idx, n_active, a);
        while n_active > 1 {
            let c = find_best_match(&nodes, &node_idx, n_active, b);
            if a == c {
                let (node_a, node_b) = (node_idx[a], node_idx[b]);
                nodes[nodes_used] = TLASNode {
                    bounds: nodes[node_a].bounds.union(&nodes[node_b].bounds),
                    left_right: (node_a as u32) | ((node_b as u32) << 16),
                    blas: 0,
                };

                node_idx[a] = nodes_used;
                node_idx[b] = node_idx[n_active - 1];
                if a == n_active - 1 {
                    a = b;
                }
                nodes_used += 1;
                n_active -= 1;
                b = find_best_match(&nodes, &node_idx, n_active, a);
            } else {
                a = b;
                b = c;
            }
        }
        nodes[0] = nodes[node_idx[a]];

        info!("TLAS created with {} nodes for {} instances", nodes_used, n);

        Ok(Self { instances, nodes })
    }

    /// Returns the instances.
    pub fn instances(&self) -> &[BVHInstance<P>] {
        &self.instances
    }

    /// Returns the flat node array.
    pub fn nodes(&self) -> &[TLASNode] {
        &self.nodes
    }

    /// Returns true if the tree holds no instances.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Returns the active node whose union with node `a` has the smallest surface
/// area. Returns `a` itself if it is the only active node.
///
/// * `nodes`    - The node array.
/// * `node_idx` - Active node indices.
/// * `n_active` - Number of active nodes in `node_idx`.
/// * `a`        - Slot of the node to match in `node_idx`.
fn find_best_match(nodes: &[TLASNode], node_idx: &[usize], n_active: usize, a: usize) -> usize {
    let bounds_a = nodes[node_idx[a]].bounds;
    let mut smallest = Float::INFINITY;
    let mut best_b = a;
    for (b, &idx) in node_idx.iter().enumerate().take(n_active) {
        if b == a {
            continue;
        }
        let area = bounds_a.union(&nodes[idx].bounds).surface_area();
        if area < smallest || best_b == a {
            smallest = area;
            best_b = b;
        }
    }
    best_b
}

impl<P: Primitive> Primitive for TLAS<P> {
    /// Returns a bounding box in the world space.
    fn world_bound(&self) -> Bounds3f {
        self.nodes.first().map_or(Bounds3f::EMPTY, |root| root.bounds)
    }

    /// Returns the nearest intersection across all instances. The hit
    /// records which instance it came from.
    ///
    /// * `r`       - The ray.
    /// * `t_range` - Valid ray parameters.
    fn intersect(&self, r: &Ray, t_range: &Interval) -> Option<SurfaceInteraction> {
        let root = self.nodes.first()?;
        root.bounds.intersect_p(r, t_range)?;

        let mut t_range = *t_range;
        let mut si: Option<SurfaceInteraction> = None;

        // Agglomerative trees are not depth bounded so the stack grows.
        let mut nodes_to_visit: Vec<(usize, Float)> = Vec::with_capacity(64);
        let mut current_node_index = 0;

        loop {
            let node = &self.nodes[current_node_index];
            let mut next = None;

            if node.is_leaf() {
                let blas = node.blas as usize;
                if let Some(mut hit) = self.instances[blas].intersect(r, &t_range) {
                    t_range.max = hit.t;
                    hit.triangle.instance = blas;
                    si = Some(hit);
                }
            } else {
                let (left, right) = (node.left(), node.right());
                let t_left = self.nodes[left].bounds.intersect_p(r, &t_range);
                let t_right = self.nodes[right].bounds.intersect_p(r, &t_range);

                next = match (t_left, t_right) {
                    (Some(tl), Some(tr)) => {
                        let (near, far, t_far) = if tl <= tr {
                            (left, right, tr)
                        } else {
                            (right, left, tl)
                        };
                        nodes_to_visit.push((far, t_far));
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
                    let mut popped = None;
                    while let Some((n, t_entry)) = nodes_to_visit.pop() {
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
