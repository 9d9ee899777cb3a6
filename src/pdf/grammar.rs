//! Grammar of typed trees
//!
//!     A [Grammar] is a set of composite types, each a sum of constructors. Every
//!     constructor is a [Production] declaring an ordered list of typed fields. Typed trees
//!     ([AbstractSyntaxTree](crate::pdf::ast::AbstractSyntaxTree)) are built against
//!     productions looked up here by constructor name.
//!
//!     Grammars are written in a subset of ASDL (see [asdl]). The grammar of the PDF
//!     object notation ships with the crate and is available through [Grammar::pdf]:
//!
//!     ```text
//!     expr = Objective(string name, expr* hdr)
//!          | Apply(string predicate, expr* arguments)
//!          | Variable(var_type type, string variable)
//!          | Reference(string ref)
//!     ```
//!
//!     Field types that are not declared as composite types (`string`, `var_type`) are
//!     primitive: their values are scalars.

pub mod asdl;
pub mod production;

pub use production::{Cardinality, FieldSpec, Production};

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;

use asdl::TypeDefinition;

const PDF_ASDL: &str = include_str!("grammar/pdf.asdl");

static PDF_GRAMMAR: Lazy<Arc<Grammar>> = Lazy::new(|| {
    Arc::new(Grammar::from_asdl(PDF_ASDL).expect("bundled PDF grammar is valid ASDL"))
});

/// Errors raised while loading or querying a grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// Malformed ASDL text
    Syntax { line: usize, message: String },
    /// Two productions share a constructor name
    DuplicateConstructor(String),
    /// Two definitions share a type name
    DuplicateType(String),
    /// No production with this constructor name
    UnknownConstructor(String),
    /// The production has no field with this name
    UnknownField { constructor: String, field: String },
    /// The grammar file could not be read
    Io(String),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::Syntax { line, message } => {
                write!(f, "Grammar syntax error on line {line}: {message}")
            }
            GrammarError::DuplicateConstructor(name) => {
                write!(f, "Constructor '{name}' is declared more than once")
            }
            GrammarError::DuplicateType(name) => {
                write!(f, "Type '{name}' is declared more than once")
            }
            GrammarError::UnknownConstructor(name) => {
                write!(f, "No production for constructor '{name}'")
            }
            GrammarError::UnknownField { constructor, field } => {
                write!(f, "Production '{constructor}' has no field '{field}'")
            }
            GrammarError::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for GrammarError {}

/// A set of composite types and their productions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    types: Vec<String>,
    productions: Vec<Arc<Production>>,
    by_constructor: HashMap<String, usize>,
}

impl Grammar {
    /// Build a grammar from parsed type definitions
    pub fn new(definitions: Vec<TypeDefinition>) -> Result<Self, GrammarError> {
        let mut grammar = Grammar {
            types: Vec::new(),
            productions: Vec::new(),
            by_constructor: HashMap::new(),
        };

        for definition in definitions {
            if grammar.types.contains(&definition.name) {
                return Err(GrammarError::DuplicateType(definition.name));
            }
            for ctor in definition.constructors {
                if grammar.by_constructor.contains_key(&ctor.name) {
                    return Err(GrammarError::DuplicateConstructor(ctor.name));
                }
                grammar
                    .by_constructor
                    .insert(ctor.name.clone(), grammar.productions.len());
                grammar.productions.push(Arc::new(Production::new(
                    definition.name.clone(),
                    ctor.name,
                    ctor.fields,
                )));
            }
            grammar.types.push(definition.name);
        }

        Ok(grammar)
    }

    /// Parse a grammar from ASDL text
    pub fn from_asdl(text: &str) -> Result<Self, GrammarError> {
        Self::new(asdl::parse_asdl(text)?)
    }

    /// Load a grammar from an ASDL file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GrammarError::Io(format!("{}: {e}", path.display())))?;
        Self::from_asdl(&text)
    }

    /// The bundled grammar of the PDF object notation
    pub fn pdf() -> Arc<Grammar> {
        Arc::clone(&PDF_GRAMMAR)
    }

    /// Find the production for a constructor name
    pub fn lookup_production_by_name(&self, name: &str) -> Result<Arc<Production>, GrammarError> {
        self.by_constructor
            .get(name)
            .map(|index| Arc::clone(&self.productions[*index]))
            .ok_or_else(|| GrammarError::UnknownConstructor(name.to_string()))
    }

    /// All productions in declaration order
    pub fn productions(&self) -> &[Arc<Production>] {
        &self.productions
    }

    /// Productions building the given composite type
    pub fn productions_of<'g>(&'g self, type_name: &'g str) -> impl Iterator<Item = &'g Arc<Production>> {
        self.productions
            .iter()
            .filter(move |p| p.type_name() == type_name)
    }

    /// Composite type names in declaration order
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// The first declared type, which roots every tree of the grammar
    pub fn root_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// Whether the type is declared by this grammar (as opposed to a primitive)
    pub fn is_composite_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t == type_name)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for type_name in &self.types {
            let indent = " ".repeat(type_name.len() + 1);
            for (i, production) in self.productions_of(type_name).enumerate() {
                if i == 0 {
                    writeln!(f, "{type_name} = {production}")?;
                } else {
                    writeln!(f, "{indent}| {production}")?;
                }
            }
        }
        Ok(())
    }
}
