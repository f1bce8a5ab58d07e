//! Host wrapper layer: one `cpdef` entry point per procedure, marshalling
//! host values into the trampoline's by-reference arguments.

pub mod arg;
pub mod docstring;
pub mod manager;
pub mod procedure;

use fw_core::ArtifactNames;
use tracing::debug;

pub use arg::{ByteView, Capabilities, HostArg};
pub use docstring::docstring;
pub use manager::HostManager;
pub use procedure::HostProcedureGen;

use crate::buffer::CodeBuffer;

/// Host extension source for every procedure.
pub fn pyx(managers: &[HostManager], ext_name: &str, names: &ArtifactNames) -> String {
    let mut buf = CodeBuffer::new();
    buf.push_line("cimport numpy as np");
    buf.push_line(format!("from {ext_name}_fc cimport *"));
    buf.push_line("from libc.string cimport memcpy");
    buf.blank_line();
    buf.push_line("np.import_array()");
    buf.push_line(format!("include \"{}\"", names.pxi_file()));
    for manager in managers {
        debug!("Generating host wrapper for {}", manager.name);
        buf.blank_line();
        HostProcedureGen::new(manager).generate(&mut buf);
    }
    buf.finish()
}
