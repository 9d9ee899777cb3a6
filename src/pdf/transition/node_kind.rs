//! Node-kind classification
//!
//! Every labeled-tree name maps to at most one kind. The rules are tried in this fixed
//! order and the first match wins:
//!
//! | # | rule                              | kind                     |
//! |---|-----------------------------------|--------------------------|
//! | 1 | starts with `obj`                 | `Objective`              |
//! | 2 | is exactly a header keyword       | `Header`                 |
//! | 3 | starts with `S`                   | `Variable(String)`       |
//! | 4 | starts with `I`                   | `Variable(Int)`          |
//! | 5 | starts with `H`                   | `Variable(Header)`       |
//! | 6 | starts with `R`                   | `Reference`              |
//!
//! Rule 2 is an exact membership test, so `SType` is not a header: it falls through to
//! rule 3 and becomes the string variable `Type`.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Header keywords, in the order they are usually documented
pub const HEADER_KEYWORDS: [&str; 15] = [
    "Type",
    "SubType",
    "Size",
    "Length",
    "Kids",
    "Parent",
    "Count",
    "Limits",
    "Range",
    "Filter",
    "Domain",
    "FuncType",
    "Pages",
    "MediaBox",
    "Resources",
];

static HEADER_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| HEADER_KEYWORDS.into_iter().collect());

pub fn is_header_keyword(name: &str) -> bool {
    HEADER_SET.contains(name)
}

/// Scalar type carried by a `Variable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    String,
    Int,
    Header,
}

impl VariableType {
    pub const ALL: [VariableType; 3] = [VariableType::String, VariableType::Int, VariableType::Header];

    /// Value of the `type` field
    pub fn as_str(self) -> &'static str {
        match self {
            VariableType::String => "string",
            VariableType::Int => "int",
            VariableType::Header => "header",
        }
    }

    /// Prefix of the surface token
    pub fn prefix(self) -> char {
        match self {
            VariableType::String => 'S',
            VariableType::Int => 'I',
            VariableType::Header => 'H',
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// Production a typed node is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductionKind {
    Objective,
    Apply,
    Variable,
    Reference,
}

impl ProductionKind {
    pub fn constructor(self) -> &'static str {
        match self {
            ProductionKind::Objective => "Objective",
            ProductionKind::Apply => "Apply",
            ProductionKind::Variable => "Variable",
            ProductionKind::Reference => "Reference",
        }
    }

    pub fn from_constructor(name: &str) -> Option<Self> {
        match name {
            "Objective" => Some(ProductionKind::Objective),
            "Apply" => Some(ProductionKind::Apply),
            "Variable" => Some(ProductionKind::Variable),
            "Reference" => Some(ProductionKind::Reference),
            _ => None,
        }
    }
}

/// Kind of a labeled-tree node, decided from its name alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Objective,
    Header,
    Variable(VariableType),
    Reference,
}

impl NodeKind {
    /// Classify a node name, or `None` when no rule matches
    pub fn classify(name: &str) -> Option<NodeKind> {
        if name.starts_with("obj") {
            return Some(NodeKind::Objective);
        }
        if is_header_keyword(name) {
            return Some(NodeKind::Header);
        }
        match name.chars().next()? {
            'S' => Some(NodeKind::Variable(VariableType::String)),
            'I' => Some(NodeKind::Variable(VariableType::Int)),
            'H' => Some(NodeKind::Variable(VariableType::Header)),
            'R' => Some(NodeKind::Reference),
            _ => None,
        }
    }

    pub fn production(self) -> ProductionKind {
        match self {
            NodeKind::Objective => ProductionKind::Objective,
            NodeKind::Header => ProductionKind::Apply,
            NodeKind::Variable(_) => ProductionKind::Variable,
            NodeKind::Reference => ProductionKind::Reference,
        }
    }
}
