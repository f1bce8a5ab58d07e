//! Docstring of a host-callable procedure.

use crate::host::manager::HostManager;

/// Lines between the opening and closing quotes.
pub fn docstring(manager: &HostManager) -> Vec<String> {
    let outs = manager.out_names();
    let mut signature = format!("{}({})", manager.name, manager.in_names().join(", "));
    if !outs.is_empty() {
        signature.push_str(&format!(" -> ({})", outs.join(", ")));
    }

    let mut lines = vec![signature, String::new()];
    lines.push("Parameters".to_string());
    lines.push("----------".to_string());
    let in_doc = manager.in_doc();
    if in_doc.is_empty() {
        lines.push("None".to_string());
    } else {
        lines.extend(in_doc);
    }
    lines.push(String::new());

    let out_doc = manager.out_doc();
    if !out_doc.is_empty() {
        lines.push("Returns".to_string());
        lines.push("-------".to_string());
        lines.extend(out_doc);
        lines.push(String::new());
    }
    lines
}
