//! Two-dimensional k-d tree over attributed samples.
//!
//! The tree is built once from a full sample set and never mutated; callers
//! rebuild it when the sample set changes.
//!
//! ```rust
//! use kdtable::tree::{Extreme, KdTree};
//! use kdtable::{Axis, Point, Sample};
//!
//! let samples = vec![
//!     Sample::new(Point::new(1.0, 164.63), ["chimie"]),
//!     Sample::new(Point::new(4.0, 176.33), ["physique"]),
//!     Sample::new(Point::new(4.0, 181.13), ["biologie"]),
//! ];
//! let tree = KdTree::build(&samples);
//!
//! assert_eq!(tree.find_extreme(Axis::X, Extreme::Max), Some(Point::new(4.0, 181.13)));
//! assert_eq!(tree.range([3.0, 170.0], [4.0, 180.0]).len(), 1);
//! ```

pub mod build;
pub mod extreme;
pub mod key;
pub mod node;
pub mod range;
pub mod render;

pub use extreme::Extreme;
pub use key::CompositeKey;
pub use node::{Internal, Leaves, Node};
pub use range::{Region, SearchStats};

use crate::types::{Axis, Point, Sample};

/// Immutable k-d tree. Empty when built from no samples.
#[derive(Debug, Clone, Default)]
pub struct KdTree {
    root: Option<Node>,
    len: usize,
}

impl KdTree {
    /// Build a balanced tree from samples with pairwise distinct coordinates.
    pub fn build(samples: &[Sample]) -> Self {
        let root = build::build(samples);
        let tree = Self {
            root,
            len: samples.len(),
        };
        log::debug!(
            "Built k-d tree with {} samples and depth {}",
            tree.len,
            tree.depth()
        );
        tree
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels, 0 for an empty tree.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::depth)
    }

    /// Every stored sample, left subtrees first.
    pub fn leaves(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.root.iter().flat_map(Node::leaves)
    }

    pub fn find_extreme(&self, axis: Axis, extreme: Extreme) -> Option<Point> {
        self.root
            .as_ref()
            .map(|root| extreme::find(root, axis, extreme))
    }

    pub fn find_min(&self, axis: Axis) -> Option<Point> {
        self.find_extreme(axis, Extreme::Min)
    }

    pub fn find_max(&self, axis: Axis) -> Option<Point> {
        self.find_extreme(axis, Extreme::Max)
    }

    /// Samples with `low[i] <= p[i] <= high[i]` on both axes.
    pub fn range(&self, low: [f64; 2], high: [f64; 2]) -> Vec<&Sample> {
        self.search(&Region::from_bounds(low, high)).0
    }

    /// Range search over an explicit query region, with traversal counters.
    pub fn search(&self, query: &Region) -> (Vec<&Sample>, SearchStats) {
        let mut out = Vec::new();
        let mut stats = SearchStats::default();
        if let Some(root) = &self.root {
            range::search(root, &Region::UNBOUNDED, query, &mut out, &mut stats);
        }
        (out, stats)
    }

    /// Multi-line text view of the tree, `None` when empty.
    pub fn render(&self, axis_names: [&str; 2]) -> Option<String> {
        self.root
            .as_ref()
            .map(|root| render::render(root, axis_names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree() {
        let tree = KdTree::build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.leaves().count(), 0);
        assert_eq!(tree.find_min(Axis::X), None);
        assert!(tree.range([0.0, 0.0], [1.0, 1.0]).is_empty());
        assert!(tree.render(["x", "y"]).is_none());
    }

    #[test]
    fn test_pruned_search_visits_fewer_nodes() {
        let samples: Vec<Sample> = (0..256)
            .map(|i| {
                Sample::new(
                    Point::new(f64::from(i % 16), f64::from(i / 16)),
                    Vec::<String>::new(),
                )
            })
            .collect();
        let tree = KdTree::build(&samples);
        assert_eq!(tree.len(), 256);

        let (hits, stats) = tree.search(&Region::from_bounds([0.0, 0.0], [1.0, 1.0]));
        assert_eq!(hits.len(), 4);
        // A full walk would enter all 511 nodes.
        assert!(stats.visited < 100, "visited {} nodes", stats.visited);
    }
}
