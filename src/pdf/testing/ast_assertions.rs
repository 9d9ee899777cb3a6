//! Fluent assertions over typed trees

use crate::pdf::ast::{AbstractSyntaxTree, FieldValue};
use crate::pdf::transition::ast_to_expr;

/// Start an assertion chain at the root of `ast`
pub fn assert_ast(ast: &AbstractSyntaxTree) -> NodeAssertion<'_> {
    NodeAssertion {
        ast,
        context: ast.constructor().to_string(),
    }
}

/// Children of a node: every child of every node or sequence field, in field order
fn children_of(ast: &AbstractSyntaxTree) -> Vec<&AbstractSyntaxTree> {
    ast.fields()
        .iter()
        .flat_map(|f| f.value().children())
        .collect()
}

fn summarize(children: &[&AbstractSyntaxTree]) -> String {
    children
        .iter()
        .map(|c| match ast_to_expr(c) {
            Ok(text) => text,
            Err(_) => c.constructor().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct NodeAssertion<'a> {
    pub(crate) ast: &'a AbstractSyntaxTree,
    pub(crate) context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn constructor(self, expected: &str) -> Self {
        assert_eq!(
            self.ast.constructor(),
            expected,
            "{}: Expected constructor {}, found {}",
            self.context,
            expected,
            self.ast.constructor()
        );
        self
    }

    pub fn scalar(self, field: &str, expected: &str) -> Self {
        let actual = match self.ast.value(field) {
            Ok(FieldValue::Scalar(value)) => value.as_str(),
            Ok(other) => panic!("{}: Field '{}' is not a scalar: {:?}", self.context, field, other),
            Err(err) => panic!("{}: {}", self.context, err),
        };
        assert_eq!(
            actual, expected,
            "{}: Expected {} = '{}', found '{}'",
            self.context, field, expected, actual
        );
        self
    }

    pub fn objective(self, name: &str) -> Self {
        self.constructor("Objective").scalar("name", name)
    }

    pub fn apply(self, predicate: &str) -> Self {
        self.constructor("Apply").scalar("predicate", predicate)
    }

    pub fn variable(self, var_type: &str, value: &str) -> Self {
        self.constructor("Variable")
            .scalar("type", var_type)
            .scalar("variable", value)
    }

    pub fn reference(self, target: &str) -> Self {
        self.constructor("Reference").scalar("ref", target)
    }

    pub fn child_count(self, expected: usize) -> Self {
        let children = children_of(self.ast);
        assert_eq!(
            children.len(),
            expected,
            "{}: Expected {} children, found {} children: [{}]",
            self.context,
            expected,
            children.len(),
            summarize(&children)
        );
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let children = children_of(self.ast);
        assert!(
            index < children.len(),
            "{}: Child index {} out of bounds (node has {} children)",
            self.context,
            index,
            children.len()
        );
        let child = children[index];
        assertion(NodeAssertion {
            ast: child,
            context: format!("{}[{}]:{}", self.context, index, child.constructor()),
        });
        self
    }

    /// The node renders to exactly this surface text
    pub fn surface(self, expected: &str) -> Self {
        let actual = ast_to_expr(self.ast)
            .unwrap_or_else(|err| panic!("{}: Cannot render node: {}", self.context, err));
        assert_eq!(
            actual, expected,
            "{}: Expected surface '{}', found '{}'",
            self.context, expected, actual
        );
        self
    }
}
