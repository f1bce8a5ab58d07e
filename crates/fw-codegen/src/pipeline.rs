//! Whole-unit generation: every artifact is rendered in memory before any
//! is handed back, so a failure leaves nothing half written.

use fw_core::{ArtifactNames, Emitter, Procedure, TypeCatalog, TypeTables};
use tracing::info;

use crate::abi::{self, AbiManager, AbiUnit};
use crate::error::Result;
use crate::host::{self, HostManager};

/// Rendered files, name and contents, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    pub files: Vec<(String, String)>,
}

impl Artifacts {
    pub fn get(&self, file: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(name, _)| name == file)
            .map(|(_, text)| text.as_str())
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(name, _)| name.as_str())
    }
}

/// File names derived from the extension module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFiles {
    pub fortran: String,
    pub header: String,
    pub pxd: String,
    pub pyx: String,
}

impl UnitFiles {
    pub fn new(ext_name: &str) -> Self {
        Self {
            fortran: format!("{ext_name}_fc.f90"),
            header: format!("{ext_name}_fc.h"),
            pxd: format!("{ext_name}_fc.pxd"),
            pyx: format!("{ext_name}.pyx"),
        }
    }
}

pub struct Generator<'a> {
    catalog: &'a TypeCatalog,
    tables: &'a TypeTables,
    names: &'a ArtifactNames,
}

impl<'a> Generator<'a> {
    pub fn new(catalog: &'a TypeCatalog, tables: &'a TypeTables, names: &'a ArtifactNames) -> Self {
        Self {
            catalog,
            tables,
            names,
        }
    }

    /// Renders the kind artifacts, the trampolines with their header and
    /// binding declarations, and the host extension source.
    pub fn generate(&self, procs: &[Procedure], ext_name: &str) -> Result<Artifacts> {
        let files = UnitFiles::new(ext_name);
        let kinds = Emitter::new(self.catalog, self.tables, self.names).render()?;

        let units = procs
            .iter()
            .map(|proc| {
                Ok(AbiUnit {
                    proc,
                    manager: AbiManager::new(proc, self.catalog)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let fortran = abi::fortran_source(&units, self.names)?;
        let header = abi::c_header(&units, &files.header, self.names);
        let pxd = abi::pxd(&units, &files.header, self.names);

        let managers: Vec<HostManager> = units
            .into_iter()
            .map(|unit| HostManager::new(unit.manager))
            .collect();
        let pyx = host::pyx(&managers, ext_name, self.names);

        let mut artifacts = Artifacts { files: kinds.files };
        artifacts.files.extend([
            (files.fortran, fortran),
            (files.header, header),
            (files.pxd, pxd),
            (files.pyx, pyx),
        ]);
        info!(
            "Generated {} files for {} procedures",
            artifacts.files.len(),
            procs.len()
        );
        Ok(artifacts)
    }
}
