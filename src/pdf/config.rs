//! Configuration loading
//!
//! The shipped defaults (`defaults/pdf-asdl.default.toml`) are compiled in. [`Loader`] stacks
//! user files and `key = value` overrides above them and yields a [`PdfAsdlConfig`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;

use crate::pdf::grammar::{Grammar, GrammarError};
use crate::pdf::transition::{TransitionError, TransitionRegistry, TransitionSystem};

const DEFAULT_TOML: &str = include_str!("../../defaults/pdf-asdl.default.toml");

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PdfAsdlConfig {
    pub parser: ParserConfig,
    pub transition: TransitionConfig,
    pub output: OutputConfig,
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub grammar: GrammarConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitionConfig {
    pub system: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusConfig {
    pub verify_round_trip: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrammarConfig {
    /// ASDL file replacing the bundled grammar
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl PdfAsdlConfig {
    /// The configured grammar, or the bundled one when no path is set
    pub fn load_grammar(&self) -> Result<Arc<Grammar>, GrammarError> {
        match &self.grammar.path {
            Some(path) => Ok(Arc::new(Grammar::from_file(path)?)),
            None => Ok(Grammar::pdf()),
        }
    }

    /// Build the default registry over the configured grammar and pick the configured system
    pub fn transition_system(&self) -> Result<Arc<dyn TransitionSystem>, TransitionError> {
        let registry = TransitionRegistry::with_defaults(self.load_grammar()?, self.parser.max_depth);
        registry.select(&self.transition.system)
    }
}

/// Builds a [`PdfAsdlConfig`] from the compiled-in defaults plus user sources
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Loader holding only the compiled-in defaults
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Adds a TOML file; `build` fails if it does not exist
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.add_toml(path.as_ref(), true)
    }

    /// Adds a TOML file that may be missing
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.add_toml(path.as_ref(), false)
    }

    fn add_toml(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merges every source, later ones winning, and deserializes the result
    pub fn build(self) -> Result<PdfAsdlConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The compiled-in defaults with nothing layered on top
pub fn load_defaults() -> Result<PdfAsdlConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_shipped_file() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parser.max_depth, 256);
        assert_eq!(config.transition.system, "pdf");
        assert_eq!(config.output.format, "surface");
        assert!(config.corpus.verify_round_trip);
        assert!(config.grammar.path.is_none());
    }

    #[test]
    fn override_replaces_default_value() {
        let config = Loader::new()
            .set_override("output.format", "treeviz")
            .expect("override to apply")
            .set_override("parser.max_depth", 8i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "treeviz");
        assert_eq!(config.parser.max_depth, 8);
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[corpus]\nverify_round_trip = false").unwrap();

        let config = Loader::new().with_file(file.path()).build().unwrap();
        assert!(!config.corpus.verify_round_trip);
        assert_eq!(config.transition.system, "pdf");
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("/nonexistent/pdf-asdl.toml").build();
        assert!(result.is_err());

        let config = Loader::new()
            .with_optional_file("/nonexistent/pdf-asdl.toml")
            .build()
            .unwrap();
        assert_eq!(config.parser.max_depth, 256);
    }

    #[test]
    fn selects_configured_system() {
        let config = load_defaults().unwrap();
        assert_eq!(config.transition_system().unwrap().name(), "pdf");

        let config = Loader::new()
            .set_override("transition.system", "lambda")
            .unwrap()
            .build()
            .unwrap();
        assert!(matches!(
            config.transition_system(),
            Err(TransitionError::UnknownSystem(_))
        ));
    }

    #[test]
    fn loads_grammar_from_path() {
        let mut file = tempfile::Builder::new().suffix(".asdl").tempfile().unwrap();
        write!(file, "{}", Grammar::pdf()).unwrap();

        let config = Loader::new()
            .set_override("grammar.path", file.path().to_string_lossy().to_string())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(*config.load_grammar().unwrap(), *Grammar::pdf());
    }
}
