//! Named renderers for typed trees
//!
//! A [`Formatter`] turns an [`AbstractSyntaxTree`] into text. [`FormatRegistry`] maps the
//! names accepted by `--format` and `output.format` onto formatters.

use std::collections::BTreeMap;
use std::fmt;

use crate::pdf::ast::AbstractSyntaxTree;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// No formatter is registered under this name
    UnknownFormat(String),
    /// The formatter could not render the tree
    Render(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnknownFormat(name) => write!(f, "No formatter named '{name}'"),
            FormatError::Render(msg) => write!(f, "Could not render tree: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

pub trait Formatter: Send + Sync {
    /// Name used to select this formatter
    fn name(&self) -> &str;

    fn serialize(&self, ast: &AbstractSyntaxTree) -> Result<String, FormatError>;

    /// One-line summary shown by `list-formats`
    fn description(&self) -> &str {
        ""
    }
}

/// Formatters keyed by name, iterated in name order
#[derive(Default)]
pub struct FormatRegistry {
    by_name: BTreeMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface, treeviz, json and yaml
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::SurfaceFormatter);
        registry.register(super::TreevizFormatter);
        registry.register(super::JsonFormatter);
        registry.register(super::YamlFormatter);
        registry
    }

    /// Adds `formatter`, replacing any formatter already under its name
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        let name = formatter.name().to_string();
        self.by_name.insert(name, Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.by_name.get(name).map(Box::as_ref)
    }

    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn serialize(&self, ast: &AbstractSyntaxTree, format: &str) -> Result<String, FormatError> {
        match self.get(format) {
            Some(formatter) => formatter.serialize(ast),
            None => Err(FormatError::UnknownFormat(format.to_string())),
        }
    }

    /// Registered names in sorted order
    pub fn list_formats(&self) -> Vec<String> {
        self.by_name.keys().cloned().collect()
    }
}
