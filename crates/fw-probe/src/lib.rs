//! Determines the concrete C type behind Fortran kind expressions by
//! compiling and running a small probe program.

pub mod compiler;
pub mod error;
pub mod program;

pub use compiler::{FortranProbe, KNOWN_COMPILERS};
pub use error::{ProbeError, Result};
