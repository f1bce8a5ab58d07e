//! Diagnostic and error reporting utilities

use fw_codegen::CodegenError;
use fw_core::CoreError;
use fw_expr::ExprError;
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};

use crate::CliError;

/// The expression error behind `err`, if any.
pub fn expression_error(err: &CliError) -> Option<&ExprError> {
    let core = match err {
        CliError::Expr(expr) => return Some(expr),
        CliError::Core(core) => core,
        CliError::Codegen(CodegenError::Core(core)) => core,
        _ => return None,
    };
    match core {
        CoreError::Expr(expr) => Some(expr),
        _ => None,
    }
}

/// Renders a labelled source snippet for expression errors. Returns false
/// when `err` carries no source.
pub fn render_cli_error(err: &CliError) -> bool {
    let Some(diagnostic) = expression_error(err) else {
        return false;
    };
    let mut out = String::new();
    if GraphicalReportHandler::new_themed(GraphicalTheme::unicode())
        .with_context_lines(3)
        .render_report(&mut out, diagnostic as &dyn Diagnostic)
        .is_err()
    {
        return false;
    }
    eprintln!("{out}");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_nested_expression_errors() {
        let expr = fw_expr::parse("a +").unwrap_err();
        let err = CliError::Codegen(CodegenError::Core(CoreError::Expr(expr)));
        assert!(expression_error(&err).is_some());
        assert!(expression_error(&CliError::Config("x".to_string())).is_none());
    }

    #[test]
    fn other_errors_are_left_to_the_logger() {
        assert!(!render_cli_error(&CliError::Generic("boom".to_string())));
    }
}
