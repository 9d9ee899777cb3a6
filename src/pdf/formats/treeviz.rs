//! Treeviz formatter for typed trees
//!
//! One line per node, nesting drawn with box connectors:
//!
//! ```text
//! ⧉ obj1
//! ├─ ≔ Type
//! │ └─ ◦ 3 : int
//! └─ ⊕ obj2
//! ```
//!
//! Icons
//!     Objective: ⧉
//!     Apply: ≔
//!     Variable: ◦
//!     Reference: ⊕
//!
//! Labels are truncated to 30 characters.

use super::registry::{FormatError, Formatter};
use crate::pdf::ast::{snapshot_from_ast, AbstractSyntaxTree, AstSnapshot};

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Objective" => "⧉",
        "Apply" => "≔",
        "Variable" => "◦",
        "Reference" => "⊕",
        _ => "○",
    }
}

/// Variables show their value with the type after it; every other node shows its label
fn display_label(snapshot: &AstSnapshot) -> String {
    match (
        snapshot.attributes.get("variable"),
        snapshot.attributes.get("type"),
    ) {
        (Some(value), Some(var_type)) if snapshot.node_type == "Variable" => {
            format!("{value} : {var_type}")
        }
        _ => snapshot.label.clone(),
    }
}

fn format_snapshot(snapshot: &AstSnapshot, prefix: &str, is_last: bool, output: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        get_icon(&snapshot.node_type),
        truncate(&display_label(snapshot), 30)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    format_children(snapshot, &child_prefix, output);
}

fn format_children(snapshot: &AstSnapshot, prefix: &str, output: &mut String) {
    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        format_snapshot(child, prefix, i == child_count - 1, output);
    }
}

pub fn to_treeviz_str(ast: &AbstractSyntaxTree) -> String {
    let snapshot = snapshot_from_ast(ast);
    let mut output = format!(
        "{} {}\n",
        get_icon(&snapshot.node_type),
        truncate(&display_label(&snapshot), 30)
    );
    format_children(&snapshot, "", &mut output);
    output
}

/// Box-drawing tree view, one node per line
pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, ast: &AbstractSyntaxTree) -> Result<String, FormatError> {
        Ok(to_treeviz_str(ast))
    }

    fn description(&self) -> &str {
        "Visual tree representation with box connectors and Unicode icons"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::grammar::Grammar;
    use crate::pdf::transition::to_ast::objective;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("obj1", 30), "obj1");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn test_leaf_root_has_no_connector() {
        let ast = objective(&Grammar::pdf(), "obj9", vec![]).unwrap();
        assert_eq!(to_treeviz_str(&ast), "⧉ obj9\n");
    }
}
