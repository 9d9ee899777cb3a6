//! Typed tree nodes
//!
//! An [`AbstractSyntaxTree`] node is tagged by a [`Production`] and holds exactly the
//! fields that production declares, in declaration order. Field shape is checked once, at
//! construction; readers can rely on it afterwards.

use std::sync::Arc;

use super::AstError;
use crate::pdf::grammar::{Cardinality, FieldSpec, Grammar, Production};

/// The value held by a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A primitive value, kept as its literal text
    Scalar(String),
    /// A single child tree
    Node(Box<AbstractSyntaxTree>),
    /// An ordered sequence of child trees
    Sequence(Vec<AbstractSyntaxTree>),
    /// An optional field with no value
    Absent,
}

impl FieldValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        FieldValue::Scalar(value.into())
    }

    pub fn node(tree: AbstractSyntaxTree) -> Self {
        FieldValue::Node(Box::new(tree))
    }

    pub fn sequence(trees: Vec<AbstractSyntaxTree>) -> Self {
        FieldValue::Sequence(trees)
    }

    fn shape(&self) -> &'static str {
        match self {
            FieldValue::Scalar(_) => "scalar",
            FieldValue::Node(_) => "node",
            FieldValue::Sequence(_) => "sequence",
            FieldValue::Absent => "absent",
        }
    }

    /// Child trees held by this value, in order
    pub fn children(&self) -> &[AbstractSyntaxTree] {
        match self {
            FieldValue::Node(node) => std::slice::from_ref(node.as_ref()),
            FieldValue::Sequence(nodes) => nodes,
            FieldValue::Scalar(_) | FieldValue::Absent => &[],
        }
    }
}

/// A field specification paired with its value
#[derive(Debug, Clone, PartialEq)]
pub struct RealizedField {
    spec: FieldSpec,
    value: FieldValue,
}

impl RealizedField {
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}

/// A typed tree node built from a production
#[derive(Debug, Clone)]
pub struct AbstractSyntaxTree {
    production: Arc<Production>,
    fields: Vec<RealizedField>,
}

impl AbstractSyntaxTree {
    /// Build a node from a production and `(field name, value)` pairs
    ///
    /// Pairs may come in any order; the node stores them in declaration order. Every
    /// declared field must be given exactly once, except optional fields, which default to
    /// [`FieldValue::Absent`].
    pub fn new<I, S>(production: Arc<Production>, values: I) -> Result<Self, AstError>
    where
        I: IntoIterator<Item = (S, FieldValue)>,
        S: Into<String>,
    {
        let mut slots: Vec<Option<FieldValue>> = vec![None; production.fields().len()];

        for (name, value) in values {
            let name = name.into();
            let index = production
                .field_index(&name)
                .ok_or_else(|| AstError::UnknownField {
                    constructor: production.constructor().to_string(),
                    field: name.clone(),
                })?;
            if slots[index].is_some() {
                return Err(AstError::DuplicateField {
                    constructor: production.constructor().to_string(),
                    field: name,
                });
            }
            check_shape(&production, &production.fields()[index], &value)?;
            slots[index] = Some(value);
        }

        let mut fields = Vec::with_capacity(slots.len());
        for (spec, slot) in production.fields().iter().zip(slots) {
            let value = match (slot, spec.cardinality()) {
                (Some(value), _) => value,
                (None, Cardinality::Optional) => FieldValue::Absent,
                (None, _) => {
                    return Err(AstError::MissingField {
                        constructor: production.constructor().to_string(),
                        field: spec.name().to_string(),
                    })
                }
            };
            fields.push(RealizedField {
                spec: spec.clone(),
                value,
            });
        }

        Ok(Self { production, fields })
    }

    pub fn production(&self) -> &Arc<Production> {
        &self.production
    }

    pub fn constructor(&self) -> &str {
        self.production.constructor()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[RealizedField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Result<&RealizedField, AstError> {
        self.fields
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| AstError::UnknownField {
                constructor: self.constructor().to_string(),
                field: name.to_string(),
            })
    }

    pub fn value(&self, name: &str) -> Result<&FieldValue, AstError> {
        self.field(name).map(RealizedField::value)
    }

    /// Text of a scalar field
    pub fn scalar(&self, name: &str) -> Result<&str, AstError> {
        match self.value(name)? {
            FieldValue::Scalar(value) => Ok(value),
            other => Err(self.shape_error(name, "scalar", other)),
        }
    }

    /// The single child held by a field
    pub fn child(&self, name: &str) -> Result<&AbstractSyntaxTree, AstError> {
        match self.value(name)? {
            FieldValue::Node(node) => Ok(node),
            other => Err(self.shape_error(name, "node", other)),
        }
    }

    /// The ordered children held by a sequence field
    pub fn sequence(&self, name: &str) -> Result<&[AbstractSyntaxTree], AstError> {
        match self.value(name)? {
            FieldValue::Sequence(nodes) => Ok(nodes),
            other => Err(self.shape_error(name, "sequence", other)),
        }
    }

    fn shape_error(&self, field: &str, expected: &'static str, found: &FieldValue) -> AstError {
        AstError::ArityMismatch {
            constructor: self.constructor().to_string(),
            field: field.to_string(),
            expected,
            found: found.shape(),
        }
    }

    /// Number of nodes in this tree
    pub fn size(&self) -> usize {
        1 + self
            .fields
            .iter()
            .flat_map(|f| f.value.children())
            .map(AbstractSyntaxTree::size)
            .sum::<usize>()
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        1 + self
            .fields
            .iter()
            .flat_map(|f| f.value.children())
            .map(AbstractSyntaxTree::depth)
            .max()
            .unwrap_or(0)
    }

    /// Check the whole tree against a grammar
    ///
    /// Construction already checks field shapes and child types. This additionally checks
    /// that every production belongs to `grammar` and that scalars only sit in primitive
    /// fields.
    pub fn sanity_check(&self, grammar: &Grammar) -> Result<(), AstError> {
        let declared = grammar
            .lookup_production_by_name(self.constructor())
            .map_err(|_| AstError::ForeignProduction(self.constructor().to_string()))?;
        if *declared != *self.production {
            return Err(AstError::ForeignProduction(self.constructor().to_string()));
        }

        for field in &self.fields {
            let composite = grammar.is_composite_type(field.spec.type_name());
            if composite && matches!(field.value, FieldValue::Scalar(_)) {
                return Err(AstError::ArityMismatch {
                    constructor: self.constructor().to_string(),
                    field: field.name().to_string(),
                    expected: "node",
                    found: "scalar",
                });
            }
            for child in field.value.children() {
                child.sanity_check(grammar)?;
            }
        }
        Ok(())
    }
}

fn check_shape(
    production: &Production,
    spec: &FieldSpec,
    value: &FieldValue,
) -> Result<(), AstError> {
    let expected = match spec.cardinality() {
        Cardinality::Single => matches!(value, FieldValue::Scalar(_) | FieldValue::Node(_)),
        Cardinality::Optional => !matches!(value, FieldValue::Sequence(_)),
        Cardinality::Multiple => matches!(value, FieldValue::Sequence(_)),
    };
    if !expected {
        return Err(AstError::ArityMismatch {
            constructor: production.constructor().to_string(),
            field: spec.name().to_string(),
            expected: match spec.cardinality() {
                Cardinality::Multiple => "sequence",
                _ => "scalar or node",
            },
            found: value.shape(),
        });
    }

    for child in value.children() {
        if child.production.type_name() != spec.type_name() {
            return Err(AstError::TypeMismatch {
                constructor: production.constructor().to_string(),
                field: spec.name().to_string(),
                expected: spec.type_name().to_string(),
                found: child.production.type_name().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prod(name: &str) -> Arc<Production> {
        Grammar::pdf().lookup_production_by_name(name).unwrap()
    }

    fn int(value: &str) -> AbstractSyntaxTree {
        AbstractSyntaxTree::new(
            prod("Variable"),
            [
                ("type", FieldValue::scalar("int")),
                ("variable", FieldValue::scalar(value)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_fields_stored_in_declaration_order() {
        let node = AbstractSyntaxTree::new(
            prod("Variable"),
            [
                ("variable", FieldValue::scalar("3")),
                ("type", FieldValue::scalar("int")),
            ],
        )
        .unwrap();
        let names: Vec<_> = node.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["type", "variable"]);
        assert_eq!(node.scalar("variable").unwrap(), "3");
    }

    #[test]
    fn test_missing_field() {
        let err = AbstractSyntaxTree::new(prod("Reference"), Vec::<(&str, FieldValue)>::new())
            .unwrap_err();
        assert_eq!(
            err,
            AstError::MissingField {
                constructor: "Reference".to_string(),
                field: "ref".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_and_duplicate_fields() {
        let err = AbstractSyntaxTree::new(prod("Reference"), [("r", FieldValue::scalar("obj1"))])
            .unwrap_err();
        assert!(matches!(err, AstError::UnknownField { .. }));

        let err = AbstractSyntaxTree::new(
            prod("Reference"),
            [
                ("ref", FieldValue::scalar("obj1")),
                ("ref", FieldValue::scalar("obj2")),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, AstError::DuplicateField { .. }));
    }

    #[test]
    fn test_sequence_required_for_multiple_field() {
        let err = AbstractSyntaxTree::new(
            prod("Apply"),
            [
                ("predicate", FieldValue::scalar("Type")),
                ("arguments", FieldValue::node(int("3"))),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            AstError::ArityMismatch {
                constructor: "Apply".to_string(),
                field: "arguments".to_string(),
                expected: "sequence",
                found: "node",
            }
        );
    }

    #[test]
    fn test_child_type_checked() {
        let grammar = Grammar::from_asdl("expr = Wrap(stmt body)\nstmt = Pass").unwrap();
        let wrap = grammar.lookup_production_by_name("Wrap").unwrap();
        let err = AbstractSyntaxTree::new(wrap, [("body", FieldValue::node(int("1")))]).unwrap_err();
        assert!(matches!(err, AstError::TypeMismatch { .. }));
    }

    #[test]
    fn test_accessors_report_wrong_shape() {
        let node = int("3");
        assert!(node.sequence("type").is_err());
        assert!(node.child("variable").is_err());
        assert!(node.scalar("missing").is_err());
    }

    #[test]
    fn test_size_and_depth() {
        let apply = AbstractSyntaxTree::new(
            prod("Apply"),
            [
                ("predicate", FieldValue::scalar("Range")),
                ("arguments", FieldValue::sequence(vec![int("0"), int("1")])),
            ],
        )
        .unwrap();
        assert_eq!(apply.size(), 3);
        assert_eq!(apply.depth(), 2);
        assert_eq!(int("3").depth(), 1);
    }

    #[test]
    fn test_sanity_check_against_other_grammar() {
        let other = Grammar::from_asdl("expr = Variable(string name)").unwrap();
        assert!(int("3").sanity_check(&Grammar::pdf()).is_ok());
        assert_eq!(
            int("3").sanity_check(&other).unwrap_err(),
            AstError::ForeignProduction("Variable".to_string())
        );
    }

    #[test]
    fn test_optional_field_defaults_to_absent() {
        let grammar = Grammar::from_asdl("expr = Name(string? id)").unwrap();
        let node =
            AbstractSyntaxTree::new(grammar.lookup_production_by_name("Name").unwrap(), Vec::<(&str, FieldValue)>::new())
                .unwrap();
        assert_eq!(node.value("id").unwrap(), &FieldValue::Absent);
    }
}
