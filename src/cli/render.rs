//! Plain-text rendering of outline trees.

use crate::models::{OutlineNode, ROOT_ID};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Draw `tree` with box-drawing connectors, one node per line.
///
/// The synthetic root is not drawn; its children become the top rows.
pub fn render_tree(tree: &OutlineNode) -> String {
    let mut out = String::new();
    if tree.id == ROOT_ID {
        render_children(&tree.children, "", &mut out);
    } else {
        out.push_str(&tree.label);
        out.push('\n');
        render_children(&tree.children, "", &mut out);
    }
    out
}

fn render_children(children: &[OutlineNode], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if last { LAST_BRANCH } else { BRANCH });
        out.push_str(&child.label);
        out.push('\n');

        let next = format!("{}{}", prefix, if last { SPACE } else { PIPE });
        render_children(&child.children, &next, out);
    }
}
