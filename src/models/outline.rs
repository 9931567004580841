use serde::{Deserialize, Serialize};

/// Id given to the synthetic root that anchors top-level headings.
pub const ROOT_ID: &str = "root";

/// Label given to the synthetic root.
pub const ROOT_LABEL: &str = "Root";

/// One node of a parsed outline.
///
/// Serialises to the `{ id, label, children }` shape renderers expect.
/// Ids are positional (`node-<line-index>`), so they are only stable for a
/// given input string and change whenever lines are inserted before a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// The synthetic root returned when an outline has no headings.
    pub fn root() -> Self {
        Self::new(ROOT_ID, ROOT_LABEL)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels in this subtree, counting this node as 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }

    /// Number of nodes in this subtree, including this node.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Pre-order walk yielding `(depth, node)`, with this node at depth 0.
    pub fn iter(&self) -> OutlineIter<'_> {
        OutlineIter {
            stack: vec![(0, self)],
        }
    }

    /// `(parent_id, child_id)` pairs, grouped by parent in pre-order, for
    /// graph renderers that want nodes and edges instead of a nested tree.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.iter()
            .flat_map(|(_, node)| {
                node.children
                    .iter()
                    .map(move |child| (node.id.as_str(), child.id.as_str()))
            })
            .collect()
    }

    /// Labels of the direct children, mostly useful in assertions.
    pub fn child_labels(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Pre-order iterator over an outline tree.
pub struct OutlineIter<'a> {
    stack: Vec<(usize, &'a OutlineNode)>,
}

impl<'a> Iterator for OutlineIter<'a> {
    type Item = (usize, &'a OutlineNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}
