//! Error types for fw-expr

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExprError>;

#[derive(Debug, Error, Diagnostic)]
pub enum ExprError {
    #[error("empty expression")]
    #[diagnostic(code(fwrap::expr::empty))]
    Empty,

    #[error("invalid token '{text}'")]
    #[diagnostic(code(fwrap::expr::lex), help("bound expressions only use literals, names, + - * / ** // and calls"))]
    Lex {
        text: String,
        #[source_code]
        src: String,
        #[label("not a valid token")]
        span: SourceSpan,
    },

    #[error("unexpected '{text}' in expression")]
    #[diagnostic(code(fwrap::expr::syntax))]
    Syntax {
        text: String,
        #[source_code]
        src: String,
        #[label("{expected}")]
        span: SourceSpan,
        expected: String,
    },

    #[error("unexpected end of expression '{src}'")]
    #[diagnostic(code(fwrap::expr::eof))]
    UnexpectedEnd { src: String },
}

impl ExprError {
    /// The source text the failure refers to.
    pub fn offending_text(&self) -> &str {
        match self {
            ExprError::Empty => "",
            ExprError::Lex { text, .. } | ExprError::Syntax { text, .. } => text,
            ExprError::UnexpectedEnd { src } => src,
        }
    }
}
