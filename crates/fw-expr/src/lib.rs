//! Parser for the Fortran constant expressions that appear in array bounds,
//! character lengths and kind selectors.

pub mod ast;
pub mod error;
mod lexer;
pub mod names;
mod parser;

pub use ast::*;
pub use error::{ExprError, Result};
pub use names::ExtractNames;

/// Parses a single expression; the whole input must be consumed.
pub fn parse(source: &str) -> Result<Expr> {
    parser::parse_expression(source)
}

/// Parses `source` and returns the names and call targets it references.
pub fn extract_names(source: &str) -> Result<ExtractNames> {
    Ok(ExtractNames::extract(&parse(source)?))
}
