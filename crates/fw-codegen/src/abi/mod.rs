//! C-ABI wrapper layer: a `bind(c)` trampoline per procedure, plus the C
//! header and host binding declarations of those trampolines.

pub mod arg;
pub mod manager;
pub mod procedure;

use fw_core::{ArtifactNames, Procedure};
use tracing::debug;

pub use arg::{AbiArg, ArgKind, ScalarKind};
pub use manager::{AbiManager, ERR_FLAG_NAME, ERR_STR_NAME};
pub use procedure::TrampolineGen;

use crate::buffer::CodeBuffer;
use crate::error::Result;

/// One procedure with its aggregated ABI signature.
pub struct AbiUnit<'a> {
    pub proc: &'a Procedure,
    pub manager: AbiManager,
}

/// Fortran source holding every trampoline.
pub fn fortran_source(units: &[AbiUnit<'_>], names: &ArtifactNames) -> Result<String> {
    let mut buf = CodeBuffer::new();
    for (idx, unit) in units.iter().enumerate() {
        if idx > 0 {
            buf.blank_line();
        }
        debug!("Generating trampoline for {}", unit.proc.name);
        TrampolineGen::new(unit.proc, &unit.manager, &names.kind_module).generate(&mut buf)?;
    }
    Ok(buf.finish())
}

/// C header declaring every trampoline.
pub fn c_header(units: &[AbiUnit<'_>], header_file: &str, names: &ArtifactNames) -> String {
    let guard = header_file.to_uppercase().replace(['.', '-'], "_");
    let mut buf = CodeBuffer::new();
    buf.push_line(format!("#ifndef {guard}"));
    buf.push_line(format!("#define {guard}"));
    buf.push_line(format!("#include \"{}\"", names.header));
    buf.blank_line();
    for unit in units {
        buf.push_line(format!("{};", unit.manager.prototype()));
    }
    buf.blank_line();
    buf.push_line("#endif");
    buf.finish()
}

/// Host binding declarations of every trampoline.
pub fn pxd(units: &[AbiUnit<'_>], header_file: &str, names: &ArtifactNames) -> String {
    let mut buf = CodeBuffer::new();
    buf.push_line(format!("from {} cimport *", names.binding_module));
    buf.blank_line();
    buf.push_line(format!("cdef extern from \"{header_file}\":"));
    buf.with_indent(|buf| {
        if units.is_empty() {
            buf.push_line("pass");
        }
        for unit in units {
            buf.push_line(unit.manager.prototype());
        }
    });
    buf.finish()
}
