//! Sideways text rendering of a tree: right subtrees above their parent,
//! left subtrees below.

use super::node::Node;

pub(crate) fn render(root: &Node, axis_names: [&str; 2]) -> String {
    let mut lines = Vec::new();
    if let Node::Internal(inner) = root {
        write_child(&inner.right, "", false, axis_names, &mut lines);
    }
    lines.push(format!("Root {}", label(root, axis_names)));
    if let Node::Internal(inner) = root {
        write_child(&inner.left, "", true, axis_names, &mut lines);
    }
    lines.join("\n")
}

fn write_child(
    node: &Node,
    prefix: &str,
    is_tail: bool,
    axis_names: [&str; 2],
    lines: &mut Vec<String>,
) {
    if let Node::Internal(inner) = node {
        let above = format!("{}{}", prefix, if is_tail { "│   " } else { "    " });
        write_child(&inner.right, &above, false, axis_names, lines);
    }

    let connector = if is_tail { "└── " } else { "┌── " };
    lines.push(format!("{}{}{}", prefix, connector, label(node, axis_names)));

    if let Node::Internal(inner) = node {
        let below = format!("{}{}", prefix, if is_tail { "    " } else { "│   " });
        write_child(&inner.left, &below, true, axis_names, lines);
    }
}

fn label(node: &Node, axis_names: [&str; 2]) -> String {
    match node {
        Node::Leaf(sample) => sample.to_string(),
        Node::Internal(inner) => format!(
            "Split {} = {:?}",
            axis_names[inner.axis.index()],
            inner.pivot.coord(inner.axis)
        ),
    }
}
