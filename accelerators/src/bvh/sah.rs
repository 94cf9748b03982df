//! Surface Area Heuristic Algorithm

use super::common::*;
use radiotrace_core::base::*;
use radiotrace_core::geometry::*;

/// Build the BVH nodes over all primitives. The index array is permuted so
/// that every leaf owns a contiguous slice of it.
///
/// * `prim_bounds`  - Bounding box of each primitive.
/// * `centroids`    - Centroid of each primitive.
/// * `prim_indices` - Primitive indices; permuted in place.
/// * `num_bins`     - Number of SAH bins per axis.
/// * `stats`        - Used to return build statistics.
pub fn build(
    prim_bounds: &[Bounds3f],
    centroids: &[Point3f],
    prim_indices: &mut [usize],
    num_bins: usize,
    stats: &mut BuildStats,
) -> Vec<BVHNode> {
    let n_primitives = prim_indices.len();
    let mut nodes = Vec::with_capacity(2 * n_primitives - 1);

    let mut root = BVHNode::new_leaf_node(0, n_primitives as u32);
    update_node_bounds(&mut root, prim_bounds, prim_indices);
    nodes.push(root);

    subdivide(0, 0, prim_bounds, centroids, prim_indices, &mut nodes, num_bins, stats);
    nodes
}

/// Recompute the bounds of a leaf node from the primitives in its slice.
///
/// * `node`         - The leaf node.
/// * `prim_bounds`  - Bounding box of each primitive.
/// * `prim_indices` - Primitive indices.
pub fn update_node_bounds(node: &mut BVHNode, prim_bounds: &[Bounds3f], prim_indices: &[usize]) {
    let first = node.left_first as usize;
    let last = first + node.prim_count as usize;
    node.bounds = prim_indices[first..last]
        .iter()
        .fold(Bounds3f::EMPTY, |b, &i| b.union(&prim_bounds[i]));
}

/// Recursively split a leaf node while the SAH says it pays off.
///
/// * `node_idx`     - Index of the node to split.
/// * `depth`        - Depth of the node.
/// * `prim_bounds`  - Bounding box of each primitive.
/// * `centroids`    - Centroid of each primitive.
/// * `prim_indices` - Primitive indices; permuted in place.
/// * `nodes`        - The node array.
/// * `num_bins`     - Number of SAH bins per axis.
/// * `stats`        - Used to return build statistics.
#[allow(clippy::too_many_arguments)]
fn subdivide(
    node_idx: usize,
    depth: usize,
    prim_bounds: &[Bounds3f],
    centroids: &[Point3f],
    prim_indices: &mut [usize],
    nodes: &mut Vec<BVHNode>,
    num_bins: usize,
    stats: &mut BuildStats,
) {
    let node = nodes[node_idx];
    let split = if node.prim_count <= 2 || depth + 1 >= MAX_STACK_DEPTH {
        None
    } else {
        find_best_split(&node, prim_bounds, centroids, prim_indices, num_bins)
            .filter(|split| split.cost < node.cost())
    };

    let Some(split) = split else {
        stats.leaf_nodes += 1;
        stats.max_depth = stats.max_depth.max(depth);
        return;
    };

    // Two-pointer partition of the node's slice around the split plane.
    let first = node.left_first as usize;
    let count = node.prim_count as usize;
    let slice = prim_indices[first..first + count].iter_mut();
    let left_count = itertools::partition(slice, |&i| centroids[i][split.axis] < split.position);

    // Rounding at the bin edges can leave one side empty.
    if left_count == 0 || left_count == count {
        stats.leaf_nodes += 1;
        stats.max_depth = stats.max_depth.max(depth);
        return;
    }

    let left_idx = nodes.len();
    let mut left = BVHNode::new_leaf_node(first as u32, left_count as u32);
    let mut right = BVHNode::new_leaf_node((first + left_count) as u32, (count - left_count) as u32);
    update_node_bounds(&mut left, prim_bounds, prim_indices);
    update_node_bounds(&mut right, prim_bounds, prim_indices);
    nodes.push(left);
    nodes.push(right);

    nodes[node_idx].left_first = left_idx as u32;
    nodes[node_idx].prim_count = 0;
    stats.interior_nodes += 1;

    subdivide(left_idx, depth + 1, prim_bounds, centroids, prim_indices, nodes, num_bins, stats);
    subdivide(left_idx + 1, depth + 1, prim_bounds, centroids, prim_indices, nodes, num_bins, stats);
}

/// Returns the cheapest split plane over all three axes, or `None` if the
/// centroids cannot be separated.
///
/// * `node`         - The leaf node to split.
/// * `prim_bounds`  - Bounding box of each primitive.
/// * `centroids`    - Centroid of each primitive.
/// * `prim_indices` - Primitive indices.
/// * `num_bins`     - Number of SAH bins per axis.
pub fn find_best_split(
    node: &BVHNode,
    prim_bounds: &[Bounds3f],
    centroids: &[Point3f],
    prim_indices: &[usize],
    num_bins: usize,
) -> Option<Split> {
    let first = node.left_first as usize;
    let indices = &prim_indices[first..first + node.prim_count as usize];
    let centroid_bounds = indices
        .iter()
        .fold(Bounds3f::EMPTY, |b, &i| b.union(&centroids[i]));

    let n_planes = num_bins - 1;
    let mut bins = vec![BinInfo::default(); num_bins];
    let mut left_area = vec![0.0; n_planes];
    let mut right_area = vec![0.0; n_planes];
    let mut left_count = vec![0_usize; n_planes];
    let mut right_count = vec![0_usize; n_planes];

    let mut best: Option<Split> = None;
    for axis in AXES {
        let (lo, hi) = (centroid_bounds.p_min[axis], centroid_bounds.p_max[axis]);
        if lo == hi {
            continue;
        }

        // Populate the bins.
        bins.fill(BinInfo::default());
        let scale = num_bins as Float / (hi - lo);
        for &i in indices {
            let b = bin_index(centroids[i][axis], lo, scale, num_bins);
            bins[b].count += 1;
            bins[b].bounds = bins[b].bounds.union(&prim_bounds[i]);
        }

        // Prefix sums from the left and suffix sums from the right.
        let (mut left_box, mut right_box) = (Bounds3f::EMPTY, Bounds3f::EMPTY);
        let (mut left_sum, mut right_sum) = (0, 0);
        for i in 0..n_planes {
            left_sum += bins[i].count;
            left_box = left_box.union(&bins[i].bounds);
            left_count[i] = left_sum;
            left_area[i] = left_box.surface_area();

            let j = num_bins - 1 - i;
            right_sum += bins[j].count;
            right_box = right_box.union(&bins[j].bounds);
            right_count[j - 1] = right_sum;
            right_area[j - 1] = right_box.surface_area();
        }

        // Evaluate the planes between bins.
        let bin_width = (hi - lo) / num_bins as Float;
        for i in 0..n_planes {
            if left_count[i] == 0 || right_count[i] == 0 {
                continue;
            }
            let cost = left_count[i] as Float * left_area[i] + right_count[i] as Float * right_area[i];
            if best.map_or(true, |b| cost < b.cost) {
                best = Some(Split {
                    axis,
                    position: lo + bin_width * (i + 1) as Float,
                    cost,
                });
            }
        }
    }
    best
}

/// Returns the bin a centroid coordinate falls into.
///
/// * `c`        - Centroid coordinate.
/// * `lo`       - Lower end of the centroid extent.
/// * `scale`    - Bins per unit length.
/// * `num_bins` - Number of bins.
#[inline]
fn bin_index(c: Float, lo: Float, scale: Float, num_bins: usize) -> usize {
    (((c - lo) * scale) as usize).min(num_bins - 1)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
