//! Transition systems
//!
//! A transition system bundles a grammar with the two transducers between surface text
//! and typed trees. Systems are looked up by name in a [TransitionRegistry]; the caller
//! builds the registry and picks the system named in its configuration.

use std::collections::HashMap;
use std::sync::Arc;

use super::to_ast::expr_to_ast_with_limit;
use super::to_expr::ast_to_expr_with_limit;
use super::TransitionError;
use crate::pdf::ast::{is_equal_ast, AbstractSyntaxTree};
use crate::pdf::expr::Parser;
use crate::pdf::grammar::Grammar;

/// Conversion between surface code and typed trees for one notation
pub trait TransitionSystem: Send + Sync {
    /// The name of this system (e.g., "pdf")
    fn name(&self) -> &str;

    /// The grammar typed trees are built against
    fn grammar(&self) -> &Grammar;

    /// Split surface code into tokens
    fn tokenize_code(&self, code: &str) -> Vec<String>;

    /// Parse surface code into a typed tree
    fn surface_code_to_ast(&self, code: &str) -> Result<AbstractSyntaxTree, TransitionError>;

    /// Render a typed tree as surface code
    fn ast_to_surface_code(&self, ast: &AbstractSyntaxTree) -> Result<String, TransitionError>;

    /// Whether a hypothesis tree matches a reference tree
    fn compare_ast(&self, hypothesis: &AbstractSyntaxTree, reference: &AbstractSyntaxTree) -> bool {
        is_equal_ast(hypothesis, reference)
    }

    /// Optional description of this system
    fn description(&self) -> &str {
        ""
    }
}

/// The PDF object notation
pub struct PdfTransitionSystem {
    grammar: Arc<Grammar>,
    parser: Parser,
}

impl PdfTransitionSystem {
    pub fn new(grammar: Arc<Grammar>) -> Self {
        Self {
            grammar,
            parser: Parser::new(),
        }
    }

    /// Both directions refuse trees nested deeper than `max_depth`
    pub fn with_max_depth(grammar: Arc<Grammar>, max_depth: usize) -> Self {
        Self {
            grammar,
            parser: Parser::with_max_depth(max_depth),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.parser.max_depth()
    }
}

impl TransitionSystem for PdfTransitionSystem {
    fn name(&self) -> &str {
        "pdf"
    }

    fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    fn tokenize_code(&self, code: &str) -> Vec<String> {
        code.trim_end_matches(['\r', '\n'])
            .split(' ')
            .map(str::to_string)
            .collect()
    }

    fn surface_code_to_ast(&self, code: &str) -> Result<AbstractSyntaxTree, TransitionError> {
        let tree = self.parser.parse_line(code)?;
        Ok(expr_to_ast_with_limit(
            &self.grammar,
            tree.root(),
            self.max_depth(),
        )?)
    }

    fn ast_to_surface_code(&self, ast: &AbstractSyntaxTree) -> Result<String, TransitionError> {
        Ok(ast_to_expr_with_limit(ast, self.max_depth())?)
    }

    fn description(&self) -> &str {
        "PDF object trees: objectives, headers, typed variables and references"
    }
}

/// Registry of transition systems
pub struct TransitionRegistry {
    systems: HashMap<String, Arc<dyn TransitionSystem>>,
}

impl TransitionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        TransitionRegistry {
            systems: HashMap::new(),
        }
    }

    /// Register a system, replacing any system with the same name
    pub fn register<T: TransitionSystem + 'static>(&mut self, system: T) {
        self.systems
            .insert(system.name().to_string(), Arc::new(system));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn TransitionSystem>> {
        self.systems.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.systems.contains_key(name)
    }

    /// Get a system by name, or fail with [TransitionError::UnknownSystem]
    pub fn select(&self, name: &str) -> Result<Arc<dyn TransitionSystem>, TransitionError> {
        self.get(name)
            .ok_or_else(|| TransitionError::UnknownSystem(name.to_string()))
    }

    /// List all system names (sorted)
    pub fn list_systems(&self) -> Vec<String> {
        let mut names: Vec<_> = self.systems.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with the built-in systems over `grammar`
    pub fn with_defaults(grammar: Arc<Grammar>, max_depth: usize) -> Self {
        let mut registry = Self::new();
        registry.register(PdfTransitionSystem::with_max_depth(grammar, max_depth));
        registry
    }
}

impl Default for TransitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
