//! The Fortran program that reports which C type each kind maps to, and
//! the parser for its output.

use std::collections::HashMap;

use fw_core::{FcType, KindDecl, ProbeRequest};

use crate::error::{ProbeError, Result};

pub const PROGRAM_NAME: &str = "fwrap_kind_probe";

/// Printed when no candidate matches.
const NO_MATCH: &str = "none";

fn param_name(idx: usize) -> String {
    format!("fw_probe_{}", idx + 1)
}

/// Renders the probe program; it prints one `<type-name> <c-type>` line per
/// request, in request order.
pub fn render(requests: &[ProbeRequest]) -> String {
    let mut lines = vec![
        format!("program {PROGRAM_NAME}"),
        "    use iso_c_binding".to_string(),
        "    implicit none".to_string(),
    ];
    for (idx, request) in requests.iter().enumerate() {
        let param = param_name(idx);
        match &request.decl {
            KindDecl::Parameter(kind) => {
                lines.push(format!("    integer, parameter :: {param} = {kind}"));
            }
            KindDecl::Variable(odecl) => {
                lines.push(format!("    {odecl} :: {param}_var"));
                lines.push(format!("    integer, parameter :: {param} = kind({param}_var)"));
            }
        }
    }
    for (idx, request) in requests.iter().enumerate() {
        let param = param_name(idx);
        let name = &request.type_name;
        if request.candidates.is_empty() {
            lines.push(format!("    print '(a)', '{name} {NO_MATCH}'"));
            continue;
        }
        for (pos, candidate) in request.candidates.iter().enumerate() {
            let keyword = if pos == 0 { "if" } else { "else if" };
            lines.push(format!("    {keyword} ({param} == {candidate}) then"));
            lines.push(format!("        print '(a)', '{name} {candidate}'"));
        }
        lines.push("    else".to_string());
        lines.push(format!("        print '(a)', '{name} {NO_MATCH}'"));
        lines.push("    end if".to_string());
    }
    lines.push(format!("end program {PROGRAM_NAME}"));
    lines.join("\n") + "\n"
}

/// Maps the program's stdout back onto the requests.
pub fn parse_output(requests: &[ProbeRequest], stdout: &str) -> Result<Vec<FcType>> {
    let mut answers = HashMap::new();
    for line in stdout.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(ty), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ProbeError::MalformedOutput(line.to_string()));
        };
        answers.insert(name, ty);
    }

    requests
        .iter()
        .map(|request| {
            let ty = answers
                .get(request.type_name.as_str())
                .ok_or_else(|| ProbeError::MissingResult(request.type_name.clone()))?;
            if *ty == NO_MATCH {
                let decl = match &request.decl {
                    KindDecl::Parameter(kind) => format!("kind {kind}"),
                    KindDecl::Variable(odecl) => odecl.clone(),
                };
                return Err(ProbeError::NoMatch {
                    type_name: request.type_name.clone(),
                    decl,
                });
            }
            ty.parse::<FcType>()
                .map_err(|_| ProbeError::MalformedOutput(format!("{} {ty}", request.type_name)))
        })
        .collect()
}
