//! Typed trees
//!
//!     An [AbstractSyntaxTree] is the canonical intermediate representation: a node tagged
//!     by a grammar [Production](crate::pdf::grammar::Production), holding one
//!     [RealizedField] per declared field. A field value is a scalar, a single child, or an
//!     ordered sequence of children ([FieldValue]).
//!
//!     Field layout is enforced when a node is built, so code reading a tree trusts it.
//!     Comparison is structural (see [compare]), and [snapshot] flattens trees for the
//!     output formats.

pub mod compare;
pub mod snapshot;
pub mod tree;

pub use compare::is_equal_ast;
pub use snapshot::{snapshot_from_ast, AstSnapshot};
pub use tree::{AbstractSyntaxTree, FieldValue, RealizedField};

use std::fmt;

/// Errors raised while building or reading typed trees
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstError {
    /// The production declares no such field
    UnknownField { constructor: String, field: String },
    /// A declared field was not given a value
    MissingField { constructor: String, field: String },
    /// A field was given more than one value
    DuplicateField { constructor: String, field: String },
    /// A value's shape does not match the field's declared arity
    ArityMismatch {
        constructor: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    /// A child's type does not match the field's declared type
    TypeMismatch {
        constructor: String,
        field: String,
        expected: String,
        found: String,
    },
    /// The node's production is not part of the grammar it was checked against
    ForeignProduction(String),
}

impl fmt::Display for AstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstError::UnknownField { constructor, field } => {
                write!(f, "{constructor} has no field '{field}'")
            }
            AstError::MissingField { constructor, field } => {
                write!(f, "{constructor} is missing field '{field}'")
            }
            AstError::DuplicateField { constructor, field } => {
                write!(f, "{constructor} field '{field}' given more than once")
            }
            AstError::ArityMismatch {
                constructor,
                field,
                expected,
                found,
            } => write!(
                f,
                "Field arity mismatch: {constructor}.{field} expects {expected}, found {found}"
            ),
            AstError::TypeMismatch {
                constructor,
                field,
                expected,
                found,
            } => write!(
                f,
                "Field type mismatch: {constructor}.{field} expects {expected}, found {found}"
            ),
            AstError::ForeignProduction(name) => {
                write!(f, "Production '{name}' does not belong to this grammar")
            }
        }
    }
}

impl std::error::Error for AstError {}
