//! Wrapper generation for fwrap: a C-ABI trampoline layer over the Fortran
//! procedures and a host extension layer over the trampolines.

pub mod abi;
pub mod buffer;
pub mod error;
pub mod host;
pub mod pipeline;

pub use abi::{AbiArg, AbiManager, ArgKind, ScalarKind};
pub use buffer::CodeBuffer;
pub use error::{CodegenError, Result};
pub use host::{ByteView, Capabilities, HostArg, HostManager};
pub use pipeline::{Artifacts, Generator, UnitFiles};
