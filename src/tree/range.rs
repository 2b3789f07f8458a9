//! Axis-aligned range search over composite-key regions.

use super::key::CompositeKey;
use super::node::Node;
use crate::types::{Axis, Point, Sample};

/// Per-axis interval of composite keys, closed at both ends.
///
/// Used both for the query rectangle and for the region a subtree can cover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub min: [CompositeKey; 2],
    pub max: [CompositeKey; 2],
}

impl Region {
    /// Region covering every possible point.
    pub const UNBOUNDED: Region = Region {
        min: [CompositeKey::MIN; 2],
        max: [CompositeKey::MAX; 2],
    };

    /// Query rectangle selecting `low[i] <= p[i] <= high[i]` on both axes.
    pub fn from_bounds(low: [f64; 2], high: [f64; 2]) -> Self {
        Self {
            min: [
                CompositeKey::lower_bound(low[0]),
                CompositeKey::lower_bound(low[1]),
            ],
            max: [
                CompositeKey::upper_bound(high[0]),
                CompositeKey::upper_bound(high[1]),
            ],
        }
    }

    /// Whether the point lies inside the region on every axis.
    pub fn contains_point(&self, point: Point) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let key = CompositeKey::for_point(point, axis);
            let i = axis.index();
            self.min[i] <= key && key <= self.max[i]
        })
    }

    /// Whether this region lies entirely inside `query`.
    pub fn is_within(&self, query: &Region) -> bool {
        (0..2).all(|i| query.min[i] <= self.min[i] && self.max[i] <= query.max[i])
    }

    /// Whether this region and `query` overlap.
    pub fn intersects(&self, query: &Region) -> bool {
        (0..2).all(|i| self.max[i] >= query.min[i] && self.min[i] <= query.max[i])
    }

    /// Regions of the left and right children of a node splitting at `split`.
    fn split(&self, axis: Axis, split: CompositeKey) -> (Region, Region) {
        let mut left = *self;
        let mut right = *self;
        left.max[axis.index()] = split;
        right.min[axis.index()] = split;
        (left, right)
    }
}

/// Counters describing how a search walked the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered by the bounded traversal.
    pub visited: usize,
    /// Subtrees collected without per-leaf tests.
    pub bulk_subtrees: usize,
    /// Leaves reported through bulk collection.
    pub bulk_leaves: usize,
}

/// Collect every leaf of `node` lying inside `query`.
///
/// `region` is the area `node` can cover; subtrees whose region sits inside
/// the query are gathered wholesale, disjoint ones are skipped.
pub(crate) fn search<'a>(
    node: &'a Node,
    region: &Region,
    query: &Region,
    out: &mut Vec<&'a Sample>,
    stats: &mut SearchStats,
) {
    stats.visited += 1;

    let inner = match node {
        Node::Leaf(sample) => {
            if query.contains_point(sample.point) {
                out.push(sample);
            }
            return;
        }
        Node::Internal(inner) => inner,
    };

    let (left_region, right_region) = region.split(inner.axis, inner.split);
    for (child, child_region) in [(&inner.left, left_region), (&inner.right, right_region)] {
        if child_region.is_within(query) {
            let before = out.len();
            out.extend(child.leaves());
            stats.bulk_subtrees += 1;
            stats.bulk_leaves += out.len() - before;
        } else if child_region.intersects(query) {
            search(child, &child_region, query, out, stats);
        }
    }
}
