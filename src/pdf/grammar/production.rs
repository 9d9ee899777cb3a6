//! Productions and their field specifications

use std::fmt;

use super::GrammarError;

/// How many values a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Exactly one value (`t name`)
    Single,
    /// Zero or one value (`t? name`)
    Optional,
    /// An ordered sequence of values (`t* name`)
    Multiple,
}

impl Cardinality {
    pub fn suffix(self) -> &'static str {
        match self {
            Cardinality::Single => "",
            Cardinality::Optional => "?",
            Cardinality::Multiple => "*",
        }
    }
}

/// A named, typed slot on a production
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    name: String,
    type_name: String,
    cardinality: Cardinality,
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            cardinality,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {}",
            self.type_name,
            self.cardinality.suffix(),
            self.name
        )
    }
}

/// A constructor of a grammar type together with its ordered fields
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    type_name: String,
    constructor: String,
    fields: Vec<FieldSpec>,
}

impl Production {
    pub fn new(
        type_name: impl Into<String>,
        constructor: impl Into<String>,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            constructor: constructor.into(),
            fields,
        }
    }

    /// Name of the composite type this production builds (e.g. `expr`)
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Constructor name (e.g. `Objective`)
    pub fn constructor(&self) -> &str {
        &self.constructor
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_name(&self, name: &str) -> Result<&FieldSpec, GrammarError> {
        self.field(name).ok_or_else(|| GrammarError::UnknownField {
            constructor: self.constructor.clone(),
            field: name.to_string(),
        })
    }

    /// Position of a field in declaration order
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.constructor)?;
        if self.fields.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        f.write_str(")")
    }
}
