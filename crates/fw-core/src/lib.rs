//! Procedure interface model and kind type-parameter resolution for fwrap.

pub mod ast;
pub mod bounds;
pub mod ctp;
pub mod emit;
pub mod error;
pub mod resolve;
pub mod types;

pub use ast::*;
pub use bounds::{declaration_order, Bound};
pub use ctp::{ConfigTypeParam, CtpClass, ERRSTR_LEN, ERRSTR_LEN_NAME, ERR_CODES};
pub use emit::{ArtifactNames, Emitter, KindArtifacts};
pub use error::{CoreError, ProbeFailure, Result};
pub use resolve::{KindDecl, KindProbe, ProbeRequest, Resolver, TypeCatalog};
pub use types::{FcType, TypeTables};
