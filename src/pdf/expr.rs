//! Labeled trees for the PDF object notation
//!
//!     A record of the notation is a parenthesized, space separated expression such as
//!     `( obj1 ( Type I3 ) R2 )`. This module turns such text into an untyped labeled tree
//!     ([ExprTree]) and back, with no knowledge of the grammar: names are just labels here.
//!
//!     The typed interpretation of the names (objects, headers, variables, references)
//!     happens in the [transition](crate::pdf::transition) module.

pub mod parser;
pub mod serializer;
pub mod tree;

pub use parser::{parse_expr, parse_line, ParseError, Parser, DEFAULT_MAX_DEPTH};
pub use serializer::to_text;
pub use tree::{ExprTree, NodeId, NodeRef};
