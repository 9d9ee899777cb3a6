//! Canonical text for labeled trees
//!
//! The exact dual of the parser's notation:
//!
//! ```text
//! leaf      NAME
//! list      ( NAME child child ... )
//! ```
//!
//! Every separator is a single space. A node is written as a list when it has children or
//! was parsed from the list form, so `( Count )` survives a round trip.

use super::tree::NodeRef;

enum Step<'a> {
    /// Write a node, preceded by a space unless it is the first thing written
    Node(NodeRef<'a>, bool),
    Close,
}

/// Serialize a node and its subtree to canonical text
///
/// Uses an explicit stack rather than recursion, so trees assembled by hand are not bound
/// by the parser's nesting limit.
pub fn to_text(node: NodeRef<'_>) -> String {
    let mut out = String::new();
    let mut pending = vec![Step::Node(node, false)];
    while let Some(step) = pending.pop() {
        let (node, spaced) = match step {
            Step::Close => {
                out.push_str(" )");
                continue;
            }
            Step::Node(node, spaced) => (node, spaced),
        };
        if spaced {
            out.push(' ');
        }
        if node.is_leaf() && !node.is_bracketed() {
            out.push_str(node.name());
            continue;
        }
        out.push_str("( ");
        out.push_str(node.name());
        pending.push(Step::Close);
        pending.extend(node.children().rev().map(|child| Step::Node(child, true)));
    }
    out
}
