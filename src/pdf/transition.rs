//! Transition between surface text and typed trees
//!
//!     Surface text is parsed into a labeled tree ([expr](crate::pdf::expr)), then each
//!     node is classified by its name ([node_kind]) and converted into a typed tree
//!     ([to_ast]). The way back ([to_expr]) renders typed trees as canonical surface
//!     text. A [TransitionSystem] packages both directions with a grammar.
//!
//!     Conversions fail with [ConversionError]; the system-level entry points wrap parse
//!     and conversion failures in [TransitionError].

pub mod node_kind;
pub mod system;
pub mod to_ast;
pub mod to_expr;

pub use node_kind::{NodeKind, ProductionKind, VariableType, HEADER_KEYWORDS};
pub use system::{PdfTransitionSystem, TransitionRegistry, TransitionSystem};
pub use to_ast::{expr_to_ast, expr_to_ast_with_limit};
pub use to_expr::{ast_to_expr, ast_to_expr_with_limit};

use std::fmt;

use crate::pdf::ast::AstError;
use crate::pdf::expr::ParseError;
use crate::pdf::grammar::GrammarError;

/// Errors raised while converting between labeled and typed trees
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// No classification rule matches the node name
    UnrecognizedNode { name: String },
    /// A variable or reference node has children
    UnexpectedChildren { name: String, count: usize },
    /// An objective or header written as a bare leaf instead of `( name ... )`
    UnbracketedList { name: String },
    /// `R` with nothing after it
    EmptyReference,
    /// An `I` payload that is not a decimal integer
    InvalidInteger { value: String },
    /// A variable whose type has no surface prefix
    InvalidVariant { value: String },
    /// A reference target without the `obj` prefix
    InvalidReference { value: String },
    /// A typed node built from a production the surface notation does not know
    UnknownProduction(String),
    /// Nesting exceeds the depth limit
    TooDeep { limit: usize },
    Grammar(GrammarError),
    Ast(AstError),
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::UnrecognizedNode { name } => {
                write!(f, "Unrecognized node kind: '{name}'")
            }
            ConversionError::UnexpectedChildren { name, count } => {
                write!(f, "Node '{name}' cannot have children (found {count})")
            }
            ConversionError::UnbracketedList { name } => {
                write!(f, "Node '{name}' must be written as '( {name} ... )'")
            }
            ConversionError::EmptyReference => write!(f, "Reference 'R' has no target"),
            ConversionError::InvalidInteger { value } => {
                write!(f, "Invalid integer literal: '{value}'")
            }
            ConversionError::InvalidVariant { value } => {
                write!(f, "Invalid variable type: '{value}'")
            }
            ConversionError::InvalidReference { value } => {
                write!(f, "Invalid reference target: '{value}' does not start with 'obj'")
            }
            ConversionError::UnknownProduction(name) => {
                write!(f, "No surface form for production '{name}'")
            }
            ConversionError::TooDeep { limit } => {
                write!(f, "Tree nesting exceeds the limit of {limit}")
            }
            ConversionError::Grammar(err) => write!(f, "{err}"),
            ConversionError::Ast(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConversionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConversionError::Grammar(err) => Some(err),
            ConversionError::Ast(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GrammarError> for ConversionError {
    fn from(err: GrammarError) -> Self {
        ConversionError::Grammar(err)
    }
}

impl From<AstError> for ConversionError {
    fn from(err: AstError) -> Self {
        ConversionError::Ast(err)
    }
}

/// Errors raised by a [TransitionSystem]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    Parse(ParseError),
    Conversion(ConversionError),
    /// No system registered under this name
    UnknownSystem(String),
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::Parse(err) => write!(f, "{err}"),
            TransitionError::Conversion(err) => write!(f, "{err}"),
            TransitionError::UnknownSystem(name) => {
                write!(f, "Transition system '{name}' not found")
            }
        }
    }
}

impl std::error::Error for TransitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransitionError::Parse(err) => Some(err),
            TransitionError::Conversion(err) => Some(err),
            TransitionError::UnknownSystem(_) => None,
        }
    }
}

impl From<ParseError> for TransitionError {
    fn from(err: ParseError) -> Self {
        TransitionError::Parse(err)
    }
}

impl From<ConversionError> for TransitionError {
    fn from(err: ConversionError) -> Self {
        TransitionError::Conversion(err)
    }
}

impl From<GrammarError> for TransitionError {
    fn from(err: GrammarError) -> Self {
        TransitionError::Conversion(ConversionError::Grammar(err))
    }
}

impl From<AstError> for TransitionError {
    fn from(err: AstError) -> Self {
        TransitionError::Conversion(ConversionError::Ast(err))
    }
}
