//! Median partition builder.
//!
//! The input is sorted once per axis. Each level takes the median of the
//! ordering that matches its split axis and partitions both orderings around
//! it, so the children receive lists that are still sorted on both axes and
//! no level needs to sort again.

use super::key::CompositeKey;
use super::node::{Internal, Node};
use crate::types::{Axis, Sample};

/// Build a tree over `samples`. Returns `None` for an empty slice.
///
/// Samples must have pairwise distinct coordinates.
pub(crate) fn build(samples: &[Sample]) -> Option<Node> {
    if samples.is_empty() {
        return None;
    }

    let by_x = sorted_by(samples, Axis::X);
    let by_y = sorted_by(samples, Axis::Y);
    Some(build_node(by_x, by_y, 0))
}

fn sorted_by(samples: &[Sample], axis: Axis) -> Vec<&Sample> {
    let mut ordered: Vec<&Sample> = samples.iter().collect();
    ordered.sort_by(|a, b| key(a, axis).cmp(&key(b, axis)));
    ordered
}

fn key(sample: &Sample, axis: Axis) -> CompositeKey {
    CompositeKey::for_point(sample.point, axis)
}

fn build_node(by_x: Vec<&Sample>, by_y: Vec<&Sample>, depth: usize) -> Node {
    debug_assert_eq!(by_x.len(), by_y.len());

    if let [only] = by_x.as_slice() {
        return Node::Leaf((*only).clone());
    }

    let axis = Axis::at_depth(depth);
    let ordered = match axis {
        Axis::X => &by_x,
        Axis::Y => &by_y,
    };
    let median = ordered[ordered.len() / 2];
    let split = key(median, axis);
    let pivot = median.point;

    let (left_x, right_x) = partition(by_x, axis, &split);
    let (left_y, right_y) = partition(by_y, axis, &split);

    // Keys are unique, so the median index leaves at least one sample on
    // each side.
    debug_assert!(!left_x.is_empty() && !right_x.is_empty());

    Node::Internal(Internal {
        axis,
        split,
        pivot,
        left: Box::new(build_node(left_x, left_y, depth + 1)),
        right: Box::new(build_node(right_x, right_y, depth + 1)),
    })
}

/// Stable split into samples sorting before `split` and the rest.
fn partition<'a>(
    samples: Vec<&'a Sample>,
    axis: Axis,
    split: &CompositeKey,
) -> (Vec<&'a Sample>, Vec<&'a Sample>) {
    samples.into_iter().partition(|s| key(s, axis) < *split)
}
