//! Surface formatter: the canonical one-line text of a typed tree

use super::registry::{FormatError, Formatter};
use crate::pdf::ast::AbstractSyntaxTree;
use crate::pdf::transition::ast_to_expr;

pub struct SurfaceFormatter;

impl Formatter for SurfaceFormatter {
    fn name(&self) -> &str {
        "surface"
    }

    fn serialize(&self, ast: &AbstractSyntaxTree) -> Result<String, FormatError> {
        ast_to_expr(ast).map_err(|e| FormatError::Render(e.to_string()))
    }

    fn description(&self) -> &str {
        "Canonical surface text, one expression per line"
    }
}
