//! Writes the resolved catalog out as the kind module, the C header, the
//! host binding declarations and the host include. All four are rendered
//! from the same catalog in the same order.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::ctp::{ConfigTypeParam, CtpClass, ERRSTR_LEN, ERRSTR_LEN_NAME, ERR_CODES};
use crate::resolve::TypeCatalog;
use crate::types::TypeTables;

const INDENT: &str = "    ";

/// File and module names of the shared kind artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactNames {
    pub kind_module: String,
    pub header: String,
    pub binding_module: String,
    pub type_spec: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            kind_module: "fwrap_ktp_mod".to_string(),
            header: "fwrap_ktp_header.h".to_string(),
            binding_module: "fwrap_ktp".to_string(),
            type_spec: "fwrap_type_specs.json".to_string(),
        }
    }
}

impl ArtifactNames {
    pub fn kind_module_file(&self) -> String {
        format!("{}.f90", self.kind_module)
    }

    pub fn pxd_file(&self) -> String {
        format!("{}.pxd", self.binding_module)
    }

    pub fn pxi_file(&self) -> String {
        format!("{}.pxi", self.binding_module)
    }

    pub fn header_guard(&self) -> String {
        self.header.to_uppercase().replace(['.', '-'], "_")
    }
}

/// The rendered kind artifacts, file name and contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindArtifacts {
    pub files: Vec<(String, String)>,
}

pub struct Emitter<'a> {
    catalog: &'a TypeCatalog,
    tables: &'a TypeTables,
    names: &'a ArtifactNames,
}

impl<'a> Emitter<'a> {
    pub fn new(catalog: &'a TypeCatalog, tables: &'a TypeTables, names: &'a ArtifactNames) -> Self {
        Self {
            catalog,
            tables,
            names,
        }
    }

    fn ctps(&self) -> &'a [ConfigTypeParam] {
        self.catalog.entries()
    }

    fn classes(&self) -> Vec<CtpClass> {
        self.ctps().iter().map(ConfigTypeParam::class).unique().collect()
    }

    pub fn kind_module(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("module {}\n", self.names.kind_module));
        out.push_str(&format!("{INDENT}use iso_c_binding\n"));
        out.push_str(&format!("{INDENT}implicit none\n"));
        for (name, code) in ERR_CODES {
            out.push_str(&format!("{INDENT}integer, parameter :: {name} = {code}\n"));
        }
        out.push_str(&format!(
            "{INDENT}integer, parameter :: {ERRSTR_LEN_NAME} = {ERRSTR_LEN}\n"
        ));
        for line in self.ctps().iter().flat_map(ConfigTypeParam::gen_f_mod) {
            out.push_str(&format!("{INDENT}{line}\n"));
        }
        out.push_str(&format!("end module {}\n", self.names.kind_module));
        out
    }

    pub fn header(&self) -> String {
        let guard = self.names.header_guard();
        let mut lines = vec![format!("#ifndef {guard}"), format!("#define {guard}")];
        lines.extend(ERR_CODES.iter().map(|(name, code)| format!("#define {name} {code}")));
        lines.push(format!("#define {ERRSTR_LEN_NAME} {ERRSTR_LEN}"));
        lines.extend(
            self.classes()
                .iter()
                .flat_map(|class| class.c_includes())
                .map(ToString::to_string),
        );
        lines.extend(self.ctps().iter().flat_map(|ctp| ctp.gen_c_typedef(self.tables)));
        lines.push("#endif".to_string());
        lines.join("\n") + "\n"
    }

    pub fn pxd(&self) -> String {
        let mut lines: Vec<String> = self
            .classes()
            .iter()
            .flat_map(|class| class.pxd_cimports())
            .map(ToString::to_string)
            .collect();
        lines.extend(
            self.ctps()
                .iter()
                .flat_map(|ctp| ctp.gen_pxd_intern_typedef(self.tables)),
        );

        let extern_block: Vec<String> = self
            .ctps()
            .iter()
            .flat_map(|ctp| ctp.gen_pxd_extern_typedef(self.tables))
            .chain(
                self.ctps()
                    .iter()
                    .flat_map(|ctp| ctp.gen_pxd_extern_extra(self.tables)),
            )
            .collect();
        if !extern_block.is_empty() {
            lines.push(format!("cdef extern from \"{}\":", self.names.header));
            lines.push(format!("{INDENT}enum:"));
            lines.extend(
                ERR_CODES
                    .iter()
                    .map(|(name, code)| format!("{INDENT}{INDENT}{name} = {code}")),
            );
            lines.push(format!("{INDENT}{INDENT}{ERRSTR_LEN_NAME} = {ERRSTR_LEN}"));
            lines.extend(extern_block.into_iter().map(|line| format!("{INDENT}{line}")));
        }
        lines.into_iter().map(|line| line + "\n").collect()
    }

    pub fn pxi(&self) -> String {
        let mut out = String::from("import numpy as np\n");
        for line in self
            .ctps()
            .iter()
            .flat_map(|ctp| ctp.gen_pyx_type_obj(self.tables))
        {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// All kind artifacts plus the persisted type spec.
    pub fn render(&self) -> crate::Result<KindArtifacts> {
        Ok(KindArtifacts {
            files: vec![
                (self.names.kind_module_file(), self.kind_module()),
                (self.names.header.clone(), self.header()),
                (self.names.pxd_file(), self.pxd()),
                (self.names.pxi_file(), self.pxi()),
                (self.names.type_spec.clone(), self.catalog.to_json()?),
            ],
        })
    }
}
