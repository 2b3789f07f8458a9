use super::key::CompositeKey;
use crate::types::{Axis, Point, Sample};

/// A node of the tree. Leaves own their sample; internal nodes own both
/// children and never carry a sample of their own.
#[derive(Debug, Clone)]
pub enum Node {
    Leaf(Sample),
    Internal(Internal),
}

/// Split node. Every leaf under `left` sorts strictly before `split` on
/// `axis`, every leaf under `right` sorts at or after it.
#[derive(Debug, Clone)]
pub struct Internal {
    pub axis: Axis,
    pub split: CompositeKey,
    /// True coordinates of the median sample the split was taken from.
    pub pivot: Point,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn sample(&self) -> Option<&Sample> {
        match self {
            Node::Leaf(sample) => Some(sample),
            Node::Internal(_) => None,
        }
    }

    /// Depth-first iterator over the samples of every leaf in this subtree.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Internal(inner) => 1 + inner.left.depth().max(inner.right.depth()),
        }
    }
}

/// Iterator returned by [`Node::leaves`]. Yields left subtrees before right.
#[derive(Debug)]
pub struct Leaves<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Sample;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Leaf(sample) => return Some(sample),
                Node::Internal(inner) => {
                    self.stack.push(&inner.right);
                    self.stack.push(&inner.left);
                }
            }
        }
        None
    }
}
