//! Structural comparison of typed trees
//!
//! Two trees are equal when they are built from the same production and every field, in
//! declaration order, holds an equal value: scalars by text, children recursively and in
//! order. Memory identity never matters, so a hypothesis tree can be checked against a
//! reference tree built independently.

use super::tree::AbstractSyntaxTree;

/// Compare two typed trees structurally
pub fn is_equal_ast(this: &AbstractSyntaxTree, other: &AbstractSyntaxTree) -> bool {
    let (a, b) = (this.production(), other.production());
    if a.constructor() != b.constructor() || a.type_name() != b.type_name() {
        return false;
    }
    this.fields().len() == other.fields().len()
        && this
            .fields()
            .iter()
            .zip(other.fields())
            .all(|(x, y)| x.name() == y.name() && x.value() == y.value())
}

impl PartialEq for AbstractSyntaxTree {
    fn eq(&self, other: &Self) -> bool {
        is_equal_ast(self, other)
    }
}
