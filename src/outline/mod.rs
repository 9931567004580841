//! Markdown outline to tree conversion.
//!
//! The backend answers with markdown where heading levels encode the
//! hierarchy (`#` title, `##` sections, ...) and `- ` items hang off the
//! heading recorded at the deepest level seen so far. [`parse_outline`]
//! turns that text into a rooted [`OutlineNode`] tree.
//!
//! Parsing never fails: streamed documents are routinely cut mid-line or
//! skip levels, and anything that does not look like a heading or list item
//! is dropped. The result is rebuilt from scratch on every call.

mod escape;

pub use escape::decode_unicode_escapes;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::models::OutlineNode;

/// `#`s, whitespace, heading text, optional trailing full-width parenthetical.
static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#+)\s+(.+?)(?:\x{FF08}(.+?)\x{FF09})?$").expect("Invalid heading regex")
});

/// `-` followed by whitespace.
static LIST_ITEM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-\s+(.*)$").expect("Invalid list item regex"));

/// A classified outline line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineLine {
    Heading { level: usize, label: String },
    ListItem { label: String },
}

/// Classify a single line, returning `None` for anything that is neither a
/// heading nor a simple list item.
pub fn classify_line(line: &str) -> Option<OutlineLine> {
    let line = line.trim_end();

    if let Some(caps) = HEADING_REGEX.captures(line) {
        let level = caps[1].len();
        let text = caps[2].trim();
        let label = match caps.get(3) {
            Some(paren) => format!("{}\u{FF08}{}\u{FF09}", text, paren.as_str()),
            None => text.to_string(),
        };
        return Some(OutlineLine::Heading { level, label });
    }

    LIST_ITEM_REGEX
        .captures(line)
        .map(|caps| OutlineLine::ListItem {
            label: caps[1].trim().to_string(),
        })
}

/// Node under construction, children referenced by arena index.
struct Draft {
    node: OutlineNode,
    parent: usize,
}

/// Parse a (possibly partial) markdown outline into a tree.
///
/// Node ids are `node-<n>` where `n` is the index of the source line among
/// the non-empty lines. The synthetic root's first child is returned when
/// there is one; otherwise the synthetic root itself.
pub fn parse_outline(markdown: &str) -> OutlineNode {
    let decoded = decode_unicode_escapes(markdown);

    // Index 0 is the synthetic root; its parent slot is never read.
    let mut arena = vec![Draft {
        node: OutlineNode::root(),
        parent: 0,
    }];
    // Heading level -> arena index of the last heading seen at that level.
    let mut open: BTreeMap<usize, usize> = BTreeMap::new();

    let lines = decoded.split('\n').filter(|line| !line.trim().is_empty());
    for (index, line) in lines.enumerate() {
        let id = format!("node-{}", index);
        match classify_line(line) {
            Some(OutlineLine::Heading { level, label }) => {
                let parent = open
                    .get(&(level - 1))
                    .or_else(|| open.range(..level).next_back().map(|(_, idx)| idx))
                    .copied()
                    .unwrap_or(0);
                arena.push(Draft {
                    node: OutlineNode::new(id, label),
                    parent,
                });
                // Deeper levels stay recorded until a heading replaces them.
                open.insert(level, arena.len() - 1);
            }
            Some(OutlineLine::ListItem { label }) => {
                let parent = open.values().next_back().copied().unwrap_or(0);
                arena.push(Draft {
                    node: OutlineNode::new(id, label),
                    parent,
                });
            }
            None => {}
        }
    }

    let mut root = assemble(arena);
    if root.children.is_empty() {
        root
    } else {
        root.children.swap_remove(0)
    }
}

/// Fold the arena into a nested tree.
///
/// Children always sit at higher indices than their parent, so walking the
/// arena backwards finishes every node before it is moved into its parent.
fn assemble(mut arena: Vec<Draft>) -> OutlineNode {
    while arena.len() > 1 {
        let Some(mut draft) = arena.pop() else { break };
        draft.node.children.reverse();
        arena[draft.parent].node.children.push(draft.node);
    }
    let mut root = arena.pop().map(|d| d.node).unwrap_or_else(OutlineNode::root);
    root.children.reverse();
    root
}
