//! Typed tree to surface text
//!
//! The inverse of [to_ast](super::to_ast): objectives and headers become bracketed
//! lists, variables get their type prefix back and references trade their `obj` prefix
//! for `R`. Output is canonically spaced.

use super::node_kind::{ProductionKind, VariableType};
use super::ConversionError;
use crate::pdf::ast::AbstractSyntaxTree;
use crate::pdf::expr::DEFAULT_MAX_DEPTH;

/// Render a typed tree as surface text
pub fn ast_to_expr(ast: &AbstractSyntaxTree) -> Result<String, ConversionError> {
    ast_to_expr_with_limit(ast, DEFAULT_MAX_DEPTH)
}

/// Render a typed tree, refusing trees nested deeper than `max_depth`
pub fn ast_to_expr_with_limit(
    ast: &AbstractSyntaxTree,
    max_depth: usize,
) -> Result<String, ConversionError> {
    let mut out = String::new();
    write_ast(ast, &mut out, 1, max_depth)?;
    Ok(out)
}

fn write_ast(
    ast: &AbstractSyntaxTree,
    out: &mut String,
    depth: usize,
    max_depth: usize,
) -> Result<(), ConversionError> {
    if depth > max_depth {
        return Err(ConversionError::TooDeep { limit: max_depth });
    }

    let kind = ProductionKind::from_constructor(ast.constructor())
        .ok_or_else(|| ConversionError::UnknownProduction(ast.constructor().to_string()))?;

    match kind {
        ProductionKind::Objective => write_list(
            ast.scalar("name")?,
            ast.sequence("hdr")?,
            out,
            depth,
            max_depth,
        ),
        ProductionKind::Apply => write_list(
            ast.scalar("predicate")?,
            ast.sequence("arguments")?,
            out,
            depth,
            max_depth,
        ),
        ProductionKind::Variable => {
            let type_name = ast.scalar("type")?;
            let var_type = VariableType::from_type_name(type_name).ok_or_else(|| {
                ConversionError::InvalidVariant {
                    value: type_name.to_string(),
                }
            })?;
            out.push(var_type.prefix());
            out.push_str(ast.scalar("variable")?);
            Ok(())
        }
        ProductionKind::Reference => {
            let target = ast.scalar("ref")?;
            let suffix = target
                .strip_prefix("obj")
                .ok_or_else(|| ConversionError::InvalidReference {
                    value: target.to_string(),
                })?;
            out.push('R');
            out.push_str(suffix);
            Ok(())
        }
    }
}

fn write_list(
    head: &str,
    children: &[AbstractSyntaxTree],
    out: &mut String,
    depth: usize,
    max_depth: usize,
) -> Result<(), ConversionError> {
    out.push_str("( ");
    out.push_str(head);
    for child in children {
        out.push(' ');
        write_ast(child, out, depth + 1, max_depth)?;
    }
    out.push_str(" )");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::ast::FieldValue;
    use crate::pdf::grammar::Grammar;
    use crate::pdf::transition::to_ast::{apply, objective, reference, variable};

    #[test]
    fn test_variables() {
        let grammar = Grammar::pdf();
        let cases = [
            (VariableType::String, "Type", "SType"),
            (VariableType::Int, "3", "I3"),
            (VariableType::Header, "Page", "HPage"),
        ];
        for (var_type, value, expected) in cases {
            let ast = variable(&grammar, var_type, value).unwrap();
            assert_eq!(ast_to_expr(&ast).unwrap(), expected);
        }
    }

    #[test]
    fn test_reference() {
        let ast = reference(&Grammar::pdf(), "obj7").unwrap();
        assert_eq!(ast_to_expr(&ast).unwrap(), "R7");
    }

    #[test]
    fn test_lists() {
        let grammar = Grammar::pdf();
        let ast = objective(
            &grammar,
            "obj1",
            vec![
                apply(&grammar, "Count", vec![]).unwrap(),
                reference(&grammar, "obj2").unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(ast_to_expr(&ast).unwrap(), "( obj1 ( Count ) R2 )");
    }

    #[test]
    fn test_invalid_variant() {
        let prod = Grammar::pdf().lookup_production_by_name("Variable").unwrap();
        let ast = AbstractSyntaxTree::new(
            prod,
            [
                ("type", FieldValue::scalar("float")),
                ("variable", FieldValue::scalar("1.5")),
            ],
        )
        .unwrap();
        assert_eq!(
            ast_to_expr(&ast).unwrap_err(),
            ConversionError::InvalidVariant {
                value: "float".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_reference() {
        let ast = reference(&Grammar::pdf(), "stream9").unwrap();
        assert_eq!(
            ast_to_expr(&ast).unwrap_err(),
            ConversionError::InvalidReference {
                value: "stream9".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_production() {
        let grammar = Grammar::from_asdl("expr = Dict(string key, expr* values)").unwrap();
        let prod = grammar.lookup_production_by_name("Dict").unwrap();
        let ast = AbstractSyntaxTree::new(
            prod,
            [
                ("key", FieldValue::scalar("Font")),
                ("values", FieldValue::sequence(vec![])),
            ],
        )
        .unwrap();
        assert_eq!(
            ast_to_expr(&ast).unwrap_err(),
            ConversionError::UnknownProduction("Dict".to_string())
        );
    }

    #[test]
    fn test_depth_limit() {
        let grammar = Grammar::pdf();
        let inner = objective(&grammar, "obj2", vec![]).unwrap();
        let ast = objective(&grammar, "obj1", vec![inner]).unwrap();
        assert!(ast_to_expr_with_limit(&ast, 2).is_ok());
        assert_eq!(
            ast_to_expr_with_limit(&ast, 1).unwrap_err(),
            ConversionError::TooDeep { limit: 1 }
        );
    }
}
