//! Labeled tree to typed tree
//!
//! Each node is classified by [NodeKind::classify] and built from the matching
//! production. Objective and header nodes must be bracketed lists, since the typed tree
//! always renders them that way; their children become the `hdr` / `arguments`
//! sequences, in order. Variable and reference nodes carry their payload in the name, so
//! they must be leaves.
//!
//! The builder helpers ([objective], [apply], [variable], [reference]) are public: tests
//! and callers assembling trees by hand go through the same production lookup.

use once_cell::sync::Lazy;
use regex::Regex;

use super::node_kind::{NodeKind, ProductionKind, VariableType};
use super::ConversionError;
use crate::pdf::ast::{AbstractSyntaxTree, FieldValue};
use crate::pdf::expr::{NodeRef, DEFAULT_MAX_DEPTH};
use crate::pdf::grammar::Grammar;

static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").unwrap());

/// Convert a labeled tree into a typed tree
pub fn expr_to_ast(grammar: &Grammar, node: NodeRef<'_>) -> Result<AbstractSyntaxTree, ConversionError> {
    expr_to_ast_with_limit(grammar, node, DEFAULT_MAX_DEPTH)
}

/// Convert a labeled tree, refusing trees nested deeper than `max_depth`
pub fn expr_to_ast_with_limit(
    grammar: &Grammar,
    node: NodeRef<'_>,
    max_depth: usize,
) -> Result<AbstractSyntaxTree, ConversionError> {
    convert(grammar, node, 1, max_depth)
}

fn convert(
    grammar: &Grammar,
    node: NodeRef<'_>,
    depth: usize,
    max_depth: usize,
) -> Result<AbstractSyntaxTree, ConversionError> {
    if depth > max_depth {
        return Err(ConversionError::TooDeep { limit: max_depth });
    }

    let name = node.name();
    let kind = NodeKind::classify(name).ok_or_else(|| ConversionError::UnrecognizedNode {
        name: name.to_string(),
    })?;

    match kind {
        NodeKind::Objective | NodeKind::Header => {
            if !node.is_bracketed() {
                return Err(ConversionError::UnbracketedList {
                    name: name.to_string(),
                });
            }
            let children = node
                .children()
                .map(|child| convert(grammar, child, depth + 1, max_depth))
                .collect::<Result<Vec<_>, _>>()?;
            if kind == NodeKind::Objective {
                objective(grammar, name, children)
            } else {
                apply(grammar, name, children)
            }
        }
        NodeKind::Variable(var_type) => {
            ensure_leaf(node)?;
            // Prefixes are ASCII, so slicing past the first byte is safe
            let value = &name[1..];
            if var_type == VariableType::Int && !INTEGER_REGEX.is_match(value) {
                return Err(ConversionError::InvalidInteger {
                    value: value.to_string(),
                });
            }
            variable(grammar, var_type, value)
        }
        NodeKind::Reference => {
            ensure_leaf(node)?;
            let target = &name[1..];
            if target.is_empty() {
                return Err(ConversionError::EmptyReference);
            }
            reference(grammar, &format!("obj{target}"))
        }
    }
}

fn ensure_leaf(node: NodeRef<'_>) -> Result<(), ConversionError> {
    if node.child_count() > 0 {
        return Err(ConversionError::UnexpectedChildren {
            name: node.name().to_string(),
            count: node.child_count(),
        });
    }
    Ok(())
}

/// Build `Objective(name, hdr)`
pub fn objective(
    grammar: &Grammar,
    name: &str,
    hdr: Vec<AbstractSyntaxTree>,
) -> Result<AbstractSyntaxTree, ConversionError> {
    let production = grammar.lookup_production_by_name(ProductionKind::Objective.constructor())?;
    Ok(AbstractSyntaxTree::new(
        production,
        [("name", FieldValue::scalar(name)), ("hdr", FieldValue::sequence(hdr))],
    )?)
}

/// Build `Apply(predicate, arguments)`
pub fn apply(
    grammar: &Grammar,
    predicate: &str,
    arguments: Vec<AbstractSyntaxTree>,
) -> Result<AbstractSyntaxTree, ConversionError> {
    let production = grammar.lookup_production_by_name(ProductionKind::Apply.constructor())?;
    Ok(AbstractSyntaxTree::new(
        production,
        [
            ("predicate", FieldValue::scalar(predicate)),
            ("arguments", FieldValue::sequence(arguments)),
        ],
    )?)
}

/// Build `Variable(type, variable)`
pub fn variable(
    grammar: &Grammar,
    var_type: VariableType,
    value: &str,
) -> Result<AbstractSyntaxTree, ConversionError> {
    let production = grammar.lookup_production_by_name(ProductionKind::Variable.constructor())?;
    Ok(AbstractSyntaxTree::new(
        production,
        [
            ("type", FieldValue::scalar(var_type.as_str())),
            ("variable", FieldValue::scalar(value)),
        ],
    )?)
}

/// Build `Reference(ref)`; `target` is the full object name, e.g. `obj7`
pub fn reference(grammar: &Grammar, target: &str) -> Result<AbstractSyntaxTree, ConversionError> {
    let production = grammar.lookup_production_by_name(ProductionKind::Reference.constructor())?;
    Ok(AbstractSyntaxTree::new(
        production,
        [("ref", FieldValue::scalar(target))],
    )?)
}
