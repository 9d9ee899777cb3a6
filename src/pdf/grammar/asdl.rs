//! ASDL grammar text
//!
//! A small subset of the Abstract Syntax Description Language, enough to declare sum types
//! over constructors with typed fields:
//!
//! ```text
//! -- comment
//! expr = Objective(string name, expr* hdr)
//!      | Reference(string ref)
//! ```
//!
//! A line containing `=` opens a type definition; lines starting with `|` add constructors
//! to the open definition. `#` and `--` start comments. Field types carry an optional `*`
//! (sequence) or `?` (optional) suffix.

use once_cell::sync::Lazy;
use regex::Regex;

use super::production::{Cardinality, FieldSpec};
use super::GrammarError;

static IDENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// One `type = Ctor | Ctor ...` definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    pub name: String,
    pub constructors: Vec<ConstructorDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDefinition {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

/// Parse ASDL text into type definitions, in declaration order
pub fn parse_asdl(text: &str) -> Result<Vec<TypeDefinition>, GrammarError> {
    let mut logical: Vec<(usize, String)> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('|') {
            match logical.last_mut() {
                Some((_, definition)) => {
                    definition.push(' ');
                    definition.push_str(line);
                }
                None => {
                    return Err(syntax(line_number, "constructor outside of a type definition"))
                }
            }
        } else if line.contains('=') {
            logical.push((line_number, line.to_string()));
        } else {
            return Err(syntax(line_number, "expected `type = Constructor ...`"));
        }
    }

    logical
        .iter()
        .map(|(line, definition)| parse_definition(*line, definition))
        .collect()
}

fn strip_comment(line: &str) -> &str {
    let cut = [line.find('#'), line.find("--")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..cut]
}

fn syntax(line: usize, message: impl Into<String>) -> GrammarError {
    GrammarError::Syntax {
        line,
        message: message.into(),
    }
}

fn parse_definition(line: usize, text: &str) -> Result<TypeDefinition, GrammarError> {
    let (name, body) = text
        .split_once('=')
        .ok_or_else(|| syntax(line, "missing `=`"))?;
    let name = expect_ident(line, name.trim(), "type name")?;

    let mut constructors = Vec::new();
    for alternative in body.split('|') {
        let alternative = alternative.trim();
        if alternative.is_empty() {
            return Err(syntax(line, format!("empty constructor in `{name}`")));
        }
        constructors.push(parse_constructor(line, alternative)?);
    }

    Ok(TypeDefinition {
        name: name.to_string(),
        constructors,
    })
}

fn parse_constructor(line: usize, text: &str) -> Result<ConstructorDefinition, GrammarError> {
    let Some(open) = text.find('(') else {
        let name = expect_ident(line, text, "constructor name")?;
        return Ok(ConstructorDefinition {
            name: name.to_string(),
            fields: Vec::new(),
        });
    };

    let name = expect_ident(line, text[..open].trim(), "constructor name")?;
    let inner = text[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| syntax(line, format!("unclosed field list for `{name}`")))?;

    let mut fields: Vec<FieldSpec> = Vec::new();
    for field in inner.split(',') {
        let field = parse_field(line, field.trim())?;
        if fields.iter().any(|f| f.name() == field.name()) {
            return Err(syntax(
                line,
                format!("duplicate field `{}` in `{name}`", field.name()),
            ));
        }
        fields.push(field);
    }

    Ok(ConstructorDefinition {
        name: name.to_string(),
        fields,
    })
}

fn parse_field(line: usize, text: &str) -> Result<FieldSpec, GrammarError> {
    let mut parts = text.split_whitespace();
    let (Some(type_part), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(syntax(line, format!("expected `type name`, found `{text}`")));
    };

    let (type_name, cardinality) = if let Some(t) = type_part.strip_suffix('*') {
        (t, Cardinality::Multiple)
    } else if let Some(t) = type_part.strip_suffix('?') {
        (t, Cardinality::Optional)
    } else {
        (type_part, Cardinality::Single)
    };

    let type_name = expect_ident(line, type_name, "field type")?;
    let name = expect_ident(line, name, "field name")?;
    Ok(FieldSpec::new(name, type_name, cardinality))
}

fn expect_ident<'t>(line: usize, text: &'t str, what: &str) -> Result<&'t str, GrammarError> {
    if IDENT_REGEX.is_match(text) {
        Ok(text)
    } else {
        Err(syntax(line, format!("invalid {what} `{text}`")))
    }
}
