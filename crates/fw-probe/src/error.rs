//! Error types for fw-probe

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ProbeError>;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Fortran compiler not found: {0}")]
    CompilerNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Probe compilation failed:\n{0}")]
    CompilationFailed(String),

    #[error("Probe program failed:\n{0}")]
    ExecutionFailed(String),

    #[error("no C interoperable type matches {type_name} ({decl})")]
    NoMatch { type_name: String, decl: String },

    #[error("probe output has no result for {0}")]
    MissingResult(String),

    #[error("malformed probe output line '{0}'")]
    MalformedOutput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
