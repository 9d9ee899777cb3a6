//! Testing utilities
//!
//! Two tools, meant to be used together:
//!
//! 1. [Samples](samples::Samples) for verified surface text. Records that end up in
//!    tests belong in `samples/`, so that a change to the notation means updating one
//!    place.
//! 2. [assert_ast] for checking typed trees. It walks whole hierarchies in one chain:
//!
//! ```rust-example
//! use crate::pdf::testing::{assert_ast, samples::Samples};
//!
//! let ast = Samples::must_get_ast("000-objectives.sexp", 0);
//! assert_ast(&ast)
//!     .objective("obj1")
//!     .child(0, |header| {
//!         header.apply("Type").child(0, |v| {
//!             v.variable("header", "Catalog");
//!         });
//!     });
//! ```
//!
//! Assertion failures name the path to the failing node, e.g.
//! `Objective[1]:Apply[0]:Reference: Expected ref = 'obj3', found 'obj2'`.

mod ast_assertions;
pub mod samples;

pub use ast_assertions::{assert_ast, NodeAssertion};
