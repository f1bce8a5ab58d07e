//! Renders the `bind(c)` trampoline of one procedure.

use fw_core::{declaration_order, Argument, Procedure, ProcedureKind};
use itertools::Itertools;

use crate::abi::arg::AbiArg;
use crate::abi::manager::{AbiManager, ERR_FLAG_NAME, ERR_STR_NAME};
use crate::buffer::CodeBuffer;
use crate::error::Result;

/// Free-form source lines longer than this are continued with `&`.
const MAX_LINE: usize = 100;

pub struct TrampolineGen<'a> {
    proc: &'a Procedure,
    manager: &'a AbiManager,
    kind_module: &'a str,
}

impl<'a> TrampolineGen<'a> {
    pub fn new(proc: &'a Procedure, manager: &'a AbiManager, kind_module: &'a str) -> Self {
        Self {
            proc,
            manager,
            kind_module,
        }
    }

    pub fn generate(&self, buf: &mut CodeBuffer) -> Result<()> {
        let manager = self.manager;
        let c_name = manager.c_name();
        push_fortran(
            buf,
            format!(
                "subroutine {c_name}({}) bind(c, name=\"{c_name}\")",
                manager.dummy_names().join(", ")
            ),
        );
        buf.indent();
        buf.push_line(format!("use {}", self.kind_module));
        buf.push_line("implicit none");
        for decl in manager.all_args().flat_map(AbiArg::dummy_decls) {
            push_fortran(buf, decl);
        }
        buf.push_line(format!(
            "integer({}), intent(out) :: {ERR_FLAG_NAME}",
            manager.flag_type
        ));
        buf.push_line(format!(
            "character(kind={}, len=1), dimension(fw_errstr_len) :: {ERR_STR_NAME}",
            manager.errstr_type
        ));
        for decl in manager.args.iter().flat_map(AbiArg::local_decls) {
            push_fortran(buf, decl);
        }
        self.interface(buf)?;

        buf.push_line(format!("{ERR_FLAG_NAME} = FW_INIT_ERR__"));
        buf.push_lines(manager.args.iter().flat_map(AbiArg::checks));
        buf.push_lines(manager.args.iter().flat_map(AbiArg::copy_in));
        let actuals = manager.args.iter().map(AbiArg::actual_arg).join(", ");
        let call = match &manager.ret {
            Some(ret) => format!("{} = {}({actuals})", ret.name, manager.name),
            None => format!("call {}({actuals})", manager.name),
        };
        push_fortran(buf, call);
        buf.push_lines(manager.args.iter().flat_map(AbiArg::copy_out));
        buf.push_line(format!("{ERR_FLAG_NAME} = FW_NO_ERR__"));
        buf.dedent();
        buf.push_line(format!("end subroutine {c_name}"));
        Ok(())
    }

    /// Interface block for the wrapped procedure, declarations ordered so
    /// bound expressions only refer to names declared above them.
    fn interface(&self, buf: &mut CodeBuffer) -> Result<()> {
        let manager = self.manager;
        let keyword = match self.proc.kind {
            ProcedureKind::Function { .. } => "function",
            ProcedureKind::Subroutine => "subroutine",
        };
        let ordered = declaration_order(&self.proc.args)?;
        let by_name = |arg: &Argument| {
            manager
                .args
                .iter()
                .find(|abi| abi.name == arg.name)
                .map(AbiArg::interface_decl)
        };

        buf.push_line("interface");
        buf.with_indent(|buf| {
            push_fortran(
                buf,
                format!(
                    "{keyword} {}({})",
                    manager.name,
                    self.proc.args.iter().map(|arg| arg.name.as_str()).join(", ")
                ),
            );
            buf.with_indent(|buf| {
                buf.push_line(format!("use {}", self.kind_module));
                buf.push_line("implicit none");
                for decl in ordered.into_iter().filter_map(by_name) {
                    push_fortran(buf, decl);
                }
                if let Some(ret) = &manager.ret {
                    buf.push_line(format!(
                        "{}({}) :: {}",
                        ret.dtype.basetype(),
                        ret.type_name,
                        manager.name
                    ));
                }
            });
            buf.push_line(format!("end {keyword} {}", manager.name));
        });
        buf.push_line("end interface");
        Ok(())
    }
}

/// Pushes a Fortran statement, continuing it across lines at argument
/// separators when it is too long.
pub(crate) fn push_fortran(buf: &mut CodeBuffer, line: impl AsRef<str>) {
    let line = line.as_ref();
    if line.len() <= MAX_LINE {
        buf.push_line(line);
        return;
    }
    let mut current = String::new();
    let mut continued = false;
    for piece in line.split_inclusive(", ") {
        if !current.is_empty() && current.len() + piece.len() > MAX_LINE {
            buf.push_line(format!("{current}&"));
            if !continued {
                buf.indent();
                continued = true;
            }
            current.clear();
        }
        current.push_str(piece);
    }
    buf.push_line(current);
    if continued {
        buf.dedent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn long_statements_are_continued() {
        let mut buf = CodeBuffer::new();
        let args = (0..30).map(|idx| format!("argument_{idx}")).join(", ");
        push_fortran(&mut buf, format!("call f({args})"));
        let text = buf.finish();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| line.len() <= MAX_LINE + 5));
        assert!(lines[..lines.len() - 1].iter().all(|line| line.ends_with(", &")));
        assert!(lines[1..].iter().all(|line| line.starts_with("    argument_")));
        assert_eq!(
            text.replace(" &\n    ", " "),
            format!("call f({args})\n")
        );
    }
}
