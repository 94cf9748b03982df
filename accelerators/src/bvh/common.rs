//! BVH Common

use radiotrace_core::base::*;
use radiotrace_core::geometry::*;

/// Default number of SAH bins per axis.
pub const DEFAULT_BINS: usize = 64;

/// Maximum depth of the tree and of the traversal stack.
pub const MAX_STACK_DEPTH: usize = 128;

/// SAH bin information.
#[derive(Copy, Clone, Debug)]
pub struct BinInfo {
    /// Count of primitives.
    pub count: usize,

    /// Bounding box for the bin.
    pub bounds: Bounds3f,
}

impl Default for BinInfo {
    /// Returns the "default value" for `BinInfo`.
    fn default() -> Self {
        Self {
            count: 0,
            bounds: Bounds3f::EMPTY,
        }
    }
}

/// Stores information needed to traverse the BVH.
#[derive(Copy, Clone, Debug)]
pub struct BVHNode {
    /// Bounding box for the node.
    pub bounds: Bounds3f,

    /// For leaf nodes, offset of the first primitive index. For interior
    /// nodes, index of the left child; the right child follows it.
    pub left_first: u32,

    /// For leaf nodes, the number of primitives in the node. For interior
    /// nodes, 0.
    pub prim_count: u32,
}

impl Default for BVHNode {
    /// Returns the "default value" for `BVHNode`.
    fn default() -> Self {
        Self {
            bounds: Bounds3f::EMPTY,
            left_first: 0,
            prim_count: 0,
        }
    }
}

impl BVHNode {
    /// Creates a leaf node.
    ///
    /// * `first`      - Offset of the first primitive index.
    /// * `prim_count` - Number of primitives in the node.
    pub fn new_leaf_node(first: u32, prim_count: u32) -> Self {
        Self {
            bounds: Bounds3f::EMPTY,
            left_first: first,
            prim_count,
        }
    }

    /// Returns true for leaf nodes.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.prim_count > 0
    }

    /// Returns the SAH cost of keeping the node as a leaf.
    pub fn cost(&self) -> Float {
        self.bounds.surface_area() * self.prim_count as Float
    }
}

/// A split plane chosen by the SAH.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Split {
    /// Axis perpendicular to the plane.
    pub axis: Axis,

    /// Position of the plane along the axis.
    pub position: Float,

    /// SAH cost of the split.
    pub cost: Float,
}

/// Statistics gathered while building a BVH.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BuildStats {
    /// Number of interior nodes.
    pub interior_nodes: usize,

    /// Number of leaf nodes.
    pub leaf_nodes: usize,

    /// Depth of the deepest leaf.
    pub max_depth: usize,
}
