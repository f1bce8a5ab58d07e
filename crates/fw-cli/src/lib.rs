//! fwrap command-line interface
//!
//! Reads a procedure interface description, resolves its kind type
//! parameters and writes the generated wrapper sources.

pub mod commands;
pub mod config;
pub mod diagnostics;

pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CliError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Configuration error: {0}")]
        Config(String),

        #[error(transparent)]
        Expr(#[from] fw_expr::ExprError),

        #[error(transparent)]
        Core(#[from] fw_core::CoreError),

        #[error(transparent)]
        Probe(#[from] fw_probe::ProbeError),

        #[error(transparent)]
        Codegen(#[from] fw_codegen::CodegenError),

        #[error("JSON error: {0}")]
        Json(#[from] serde_json::Error),

        #[error("{0}")]
        Generic(String),
    }

    impl From<eyre::Report> for CliError {
        fn from(err: eyre::Report) -> Self {
            CliError::Generic(format!("{err:#}"))
        }
    }

    pub type Result<T> = std::result::Result<T, CliError>;
}

pub use error::{CliError, Result};
