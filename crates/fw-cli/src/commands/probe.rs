//! `fwrap probe`: resolve kinds only and persist the type spec.

use std::path::PathBuf;

use clap::Args;
use eyre::WrapErr;
use tracing::info;

use crate::commands::{load_procedures, resolve};
use crate::config::FwrapConfig;
use crate::Result;

#[derive(Debug, Clone, Args)]
pub struct ProbeArgs {
    /// Interface description (JSON list of procedures)
    pub input: PathBuf,

    /// Where to write the type spec; defaults to the configured name
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Fortran compiler used for probing
    #[arg(long)]
    pub compiler: Option<String>,
}

pub fn probe_command(args: ProbeArgs, config: &FwrapConfig) -> Result<()> {
    let procs = load_procedures(&args.input)?;
    let catalog = resolve(&procs, config, args.compiler.as_deref())?;
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(&config.output.type_spec));
    std::fs::write(&out, catalog.to_json()?)
        .wrap_err_with(|| format!("Failed to write {}", out.display()))?;
    info!("Wrote {} type parameters to {}", catalog.len(), out.display());
    Ok(())
}
