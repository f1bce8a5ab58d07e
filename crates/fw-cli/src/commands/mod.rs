//! Command implementations for the fwrap CLI

pub mod gen;
pub mod names;
pub mod probe;

pub use gen::gen_command;
pub use names::names_command;
pub use probe::probe_command;

use std::path::Path;

use eyre::WrapErr;
use fw_core::{Procedure, Resolver, TypeCatalog, TypeTables};
use fw_probe::FortranProbe;
use tracing::info;

use crate::config::FwrapConfig;
use crate::Result;

/// Reads the procedure list produced by the front end.
pub fn load_procedures(path: &Path) -> Result<Vec<Procedure>> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read interface file {}", path.display()))?;
    let procs: Vec<Procedure> = serde_json::from_str(&text)
        .wrap_err_with(|| format!("Failed to parse interface file {}", path.display()))?;
    info!("Loaded {} procedures from {}", procs.len(), path.display());
    Ok(procs)
}

/// The probe described by the configuration, with an optional compiler
/// override from the command line.
pub fn build_probe(config: &FwrapConfig, compiler: Option<&str>) -> Result<FortranProbe> {
    let probe = match compiler.or(config.toolchain.compiler.as_deref()) {
        Some(compiler) => FortranProbe::with_path(compiler)?,
        None => FortranProbe::new()?,
    };
    Ok(probe.with_flags(config.toolchain.flags.iter().cloned()))
}

/// Runs kind resolution for `procs` with the configured compiler.
pub fn resolve(
    procs: &[Procedure],
    config: &FwrapConfig,
    compiler: Option<&str>,
) -> Result<TypeCatalog> {
    let probe = build_probe(config, compiler)?;
    info!("Probing kinds with {}", probe.compiler().display());
    Ok(Resolver::new(TypeTables::standard()).resolve(procs, &probe)?)
}
