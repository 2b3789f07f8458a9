//! Pruned minimum / maximum search.

use super::key::CompositeKey;
use super::node::Node;
use crate::types::{Axis, Point};
use serde::{Deserialize, Serialize};

/// Which end of an axis to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extreme {
    Min,
    Max,
}

impl Extreme {
    /// Whether `candidate` beats `incumbent` for this extreme.
    fn prefers(self, candidate: &CompositeKey, incumbent: &CompositeKey) -> bool {
        match self {
            Extreme::Min => candidate < incumbent,
            Extreme::Max => candidate > incumbent,
        }
    }
}

/// Extreme point of the subtree along `axis`, ties broken by the composite key.
///
/// When a node splits on `axis` only one side can hold the answer: the left
/// side for a minimum, the right side for a maximum. The stored pivot is a
/// member of the right side and is compared directly, so the minimum search
/// never descends right on a matching split.
pub(crate) fn find(node: &Node, axis: Axis, extreme: Extreme) -> Point {
    match node {
        Node::Leaf(sample) => sample.point,
        Node::Internal(inner) if inner.axis == axis => {
            let side = match extreme {
                Extreme::Min => &inner.left,
                Extreme::Max => &inner.right,
            };
            better(find(side, axis, extreme), inner.pivot, axis, extreme)
        }
        Node::Internal(inner) => {
            let left = find(&inner.left, axis, extreme);
            let right = find(&inner.right, axis, extreme);
            let best_child = better(left, right, axis, extreme);
            better(best_child, inner.pivot, axis, extreme)
        }
    }
}

fn better(candidate: Point, incumbent: Point, axis: Axis, extreme: Extreme) -> Point {
    let candidate_key = CompositeKey::for_point(candidate, axis);
    let incumbent_key = CompositeKey::for_point(incumbent, axis);
    if extreme.prefers(&candidate_key, &incumbent_key) {
        candidate
    } else {
        incumbent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build::build;
    use crate::types::Sample;

    fn tree(points: &[(f64, f64)]) -> Node {
        let samples: Vec<Sample> = points
            .iter()
            .map(|&(x, y)| Sample::new(Point::new(x, y), Vec::<String>::new()))
            .collect();
        build(&samples).unwrap()
    }

    fn students() -> Node {
        tree(&[
            (1.0, 164.63),
            (2.0, 167.45),
            (3.0, 182.0),
            (4.0, 176.33),
            (4.0, 181.13),
        ])
    }

    #[test]
    fn test_min_per_axis() {
        let root = students();
        assert_eq!(find(&root, Axis::X, Extreme::Min), Point::new(1.0, 164.63));
        assert_eq!(find(&root, Axis::Y, Extreme::Min), Point::new(1.0, 164.63));
    }

    #[test]
    fn test_max_per_axis_with_tie_break() {
        let root = students();
        // Two samples share x = 4; the larger y wins the tie.
        assert_eq!(find(&root, Axis::X, Extreme::Max), Point::new(4.0, 181.13));
        assert_eq!(find(&root, Axis::Y, Extreme::Max), Point::new(3.0, 182.0));
    }

    #[test]
    fn test_single_leaf() {
        let root = tree(&[(7.0, -3.0)]);
        for axis in Axis::ALL {
            assert_eq!(find(&root, axis, Extreme::Min), Point::new(7.0, -3.0));
            assert_eq!(find(&root, axis, Extreme::Max), Point::new(7.0, -3.0));
        }
    }

    #[test]
    fn test_column_of_equal_x() {
        let root = tree(&[(0.0, 5.0), (0.0, -2.0), (0.0, 9.0), (0.0, 1.0)]);
        assert_eq!(find(&root, Axis::X, Extreme::Min), Point::new(0.0, -2.0));
        assert_eq!(find(&root, Axis::X, Extreme::Max), Point::new(0.0, 9.0));
        assert_eq!(find(&root, Axis::Y, Extreme::Min), Point::new(0.0, -2.0));
    }
}
