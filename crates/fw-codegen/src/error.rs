//! Error types for fw-codegen

use fw_core::CoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodegenError>;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("'{procedure}' declares argument '{arg}' more than once")]
    DuplicateArgument { procedure: String, arg: String },

    #[error("argument name '{0}' is reserved for generated code")]
    ReservedName(String),
}
