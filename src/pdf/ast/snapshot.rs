//! AST Snapshot - a normalized intermediate representation of the typed tree
//!
//! The snapshot captures node types, labels, scalar attributes and children, so each
//! formatter only deals with presentation. All serializers should consume
//! [`snapshot_from_ast`] rather than walking the typed tree themselves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tree::{AbstractSyntaxTree, FieldValue};

/// A snapshot of a typed node in a normalized, serializable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstSnapshot {
    /// The constructor of the node (e.g. "Objective", "Reference")
    pub node_type: String,

    /// The first scalar field of the node, or empty when it has none
    pub label: String,

    /// Scalar fields by name
    pub attributes: BTreeMap<String, String>,

    /// Child nodes, in field order then sequence order
    pub children: Vec<AstSnapshot>,
}

impl AstSnapshot {
    pub fn new(node_type: String, label: String) -> Self {
        Self {
            node_type,
            label,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: String, value: String) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn with_child(mut self, child: AstSnapshot) -> Self {
        self.children.push(child);
        self
    }
}

/// Build a snapshot of a typed tree and all its descendants
pub fn snapshot_from_ast(ast: &AbstractSyntaxTree) -> AstSnapshot {
    let label = ast
        .fields()
        .iter()
        .find_map(|f| match f.value() {
            FieldValue::Scalar(value) => Some(value.clone()),
            _ => None,
        })
        .unwrap_or_default();

    let mut snapshot = AstSnapshot::new(ast.constructor().to_string(), label);
    for field in ast.fields() {
        match field.value() {
            FieldValue::Scalar(value) => {
                snapshot
                    .attributes
                    .insert(field.name().to_string(), value.clone());
            }
            FieldValue::Node(_) | FieldValue::Sequence(_) => {
                for child in field.value().children() {
                    snapshot.children.push(snapshot_from_ast(child));
                }
            }
            FieldValue::Absent => {}
        }
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::grammar::Grammar;

    #[test]
    fn test_snapshot_of_variable() {
        let prod = Grammar::pdf().lookup_production_by_name("Variable").unwrap();
        let ast = AbstractSyntaxTree::new(
            prod,
            [
                ("type", FieldValue::scalar("string")),
                ("variable", FieldValue::scalar("Page")),
            ],
        )
        .unwrap();

        let snapshot = snapshot_from_ast(&ast);
        let expected = AstSnapshot::new("Variable".to_string(), "string".to_string())
            .with_attribute("type".to_string(), "string".to_string())
            .with_attribute("variable".to_string(), "Page".to_string());
        assert_eq!(snapshot, expected);
    }

    #[test]
    fn test_snapshot_children_in_order() {
        let grammar = Grammar::pdf();
        let reference = |target: &str| {
            AbstractSyntaxTree::new(
                grammar.lookup_production_by_name("Reference").unwrap(),
                [("ref", FieldValue::scalar(target))],
            )
            .unwrap()
        };
        let ast = AbstractSyntaxTree::new(
            grammar.lookup_production_by_name("Apply").unwrap(),
            [
                ("predicate", FieldValue::scalar("Kids")),
                (
                    "arguments",
                    FieldValue::sequence(vec![reference("obj2"), reference("obj3")]),
                ),
            ],
        )
        .unwrap();

        let snapshot = snapshot_from_ast(&ast);
        assert_eq!(snapshot.label, "Kids");
        let labels: Vec<_> = snapshot.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["obj2", "obj3"]);
    }
}
