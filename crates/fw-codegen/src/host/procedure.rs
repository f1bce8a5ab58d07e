//! Renders the host-callable wrapper of one procedure.

use crate::buffer::CodeBuffer;
use crate::host::docstring::docstring;
use crate::host::manager::HostManager;

pub struct HostProcedureGen<'a> {
    manager: &'a HostManager,
}

impl<'a> HostProcedureGen<'a> {
    pub fn new(manager: &'a HostManager) -> Self {
        Self { manager }
    }

    pub fn generate(&self, buf: &mut CodeBuffer) {
        let manager = self.manager;
        buf.push_line(format!(
            "cpdef api object {}({}):",
            manager.name,
            manager.arg_declarations().join(", ")
        ));
        buf.indent();
        buf.push_line("\"\"\"");
        buf.push_lines(docstring(manager));
        buf.push_line("\"\"\"");
        buf.push_lines(manager.temp_declarations());
        buf.push_lines(manager.pre_call());

        let views = manager.byte_views();
        if views.is_empty() {
            self.call(buf);
        } else {
            buf.push_lines(views.iter().flat_map(|view| view.save.iter()));
            buf.push_line("try:");
            buf.with_indent(|buf| {
                buf.push_lines(views.iter().flat_map(|view| view.acquire.iter()));
                self.call(buf)
            });
            buf.push_line("finally:");
            buf.with_indent(|buf| {
                buf.push_lines(views.iter().rev().flat_map(|view| view.release.iter()))
            });
        }

        buf.push_lines(manager.post_call());
        buf.push_line(return_statement(&manager.return_tuple()));
        buf.dedent();
    }

    fn call(&self, buf: &mut CodeBuffer) {
        let manager = self.manager;
        buf.push_line(format!(
            "{}({})",
            manager.c_name,
            manager.call_arg_list().join(", ")
        ));
        buf.push_line("if fw_iserr__ != FW_NO_ERR__:");
        buf.with_indent(|buf| {
            buf.push_line(format!(
                "raise RuntimeError(\"an error was encountered when calling the '{}' wrapper.\")",
                manager.name
            ))
        });
    }
}

fn return_statement(names: &[String]) -> String {
    if names.is_empty() {
        "return ()".to_string()
    } else {
        format!("return ({},)", names.join(", "))
    }
}
