//! Error types for fw-core

use fw_expr::ExprError;
use thiserror::Error;

use crate::ast::Basetype;
use crate::types::FcType;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Error reported by a [`crate::resolve::KindProbe`] implementation.
pub type ProbeFailure = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid expression: {0}")]
    Expr(#[from] ExprError),

    #[error("unknown language '{0}', not one of 'c' or 'fortran'")]
    UnknownLanguage(String),

    #[error("invalid type declaration '{odecl}': {reason}")]
    InvalidTypeDecl { odecl: String, reason: String },

    #[error("invalid dimension bound '{0}'")]
    InvalidBound(String),

    #[error("unknown C type '{0}'")]
    UnknownCType(String),

    #[error("unknown interoperable type '{0}'")]
    UnknownFcType(String),

    #[error("type '{0}' has not been resolved; run kind resolution first")]
    Unresolved(String),

    #[error("function '{procedure}' cannot return {reason}")]
    InvalidReturn { procedure: String, reason: String },

    #[error("kind probe failed: {0}")]
    Probe(#[source] ProbeFailure),

    #[error("kind probe answered {got} of {expected} requests")]
    ProbeIncomplete { expected: usize, got: usize },

    #[error("kind probe mapped {type_name} to {fc_type}, which is not a valid {basetype} type")]
    ProbeMismatch {
        type_name: String,
        basetype: Basetype,
        fc_type: FcType,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
