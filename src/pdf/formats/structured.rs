//! JSON and YAML formatters
//!
//! Both serialize the [AstSnapshot](crate::pdf::ast::AstSnapshot) of the tree, so the two
//! formats always carry the same fields.

use super::registry::{FormatError, Formatter};
use crate::pdf::ast::{snapshot_from_ast, AbstractSyntaxTree};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, ast: &AbstractSyntaxTree) -> Result<String, FormatError> {
        serde_json::to_string_pretty(&snapshot_from_ast(ast))
            .map_err(|e| FormatError::Render(e.to_string()))
    }

    fn description(&self) -> &str {
        "Pretty-printed JSON snapshot of the typed tree"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, ast: &AbstractSyntaxTree) -> Result<String, FormatError> {
        serde_yaml::to_string(&snapshot_from_ast(ast))
            .map_err(|e| FormatError::Render(e.to_string()))
    }

    fn description(&self) -> &str {
        "YAML snapshot of the typed tree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::ast::AstSnapshot;
    use crate::pdf::grammar::Grammar;
    use crate::pdf::transition::to_ast::{apply, objective, reference};

    fn sample() -> AbstractSyntaxTree {
        let grammar = Grammar::pdf();
        objective(
            &grammar,
            "obj1",
            vec![apply(&grammar, "Kids", vec![reference(&grammar, "obj2").unwrap()]).unwrap()],
        )
        .unwrap()
    }

    #[test]
    fn test_json_parses_back_to_snapshot() {
        let ast = sample();
        let json = JsonFormatter.serialize(&ast).unwrap();
        let snapshot: AstSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, snapshot_from_ast(&ast));
        assert_eq!(snapshot.children[0].children[0].label, "obj2");
    }

    #[test]
    fn test_yaml_parses_back_to_snapshot() {
        let ast = sample();
        let yaml = YamlFormatter.serialize(&ast).unwrap();
        let snapshot: AstSnapshot = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(snapshot, snapshot_from_ast(&ast));
    }
}
