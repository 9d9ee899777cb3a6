//! # pdf-asdl
//!
//! Round-trip conversion between the symbolic PDF object notation and typed ASDL trees.
//!
//! File Layout
//!
//! The library lives under `src/pdf`, split along the data flow:
//!
//! src/pdf
//!   ├── expr         Labeled trees: parser, node arena and canonical serializer
//!   ├── grammar      ASDL productions and field specs
//!   ├── ast          Typed trees built from productions, plus the structural comparator
//!   ├── transition   Surface <-> AST transducers and the transition systems around them
//!   ├── formats      Output formats for typed trees
//!   ├── corpus       Line-oriented batch processing
//!   ├── config       Layered configuration
//!   └── testing      Assertions and sample corpus for tests
//!
//! The one-line summary of the pipeline is:
//!
//! ```text
//! text --parse--> ExprTree --expr_to_ast--> AbstractSyntaxTree --ast_to_expr--> text
//! ```

pub mod pdf;
