//! `fwrap gen`: resolve kinds and write every wrapper artifact.

use std::path::{Path, PathBuf};

use clap::Args;
use eyre::WrapErr;
use fw_codegen::{Artifacts, Generator};
use fw_core::{TypeCatalog, TypeTables};
use tracing::{debug, info};

use crate::commands::{load_procedures, resolve};
use crate::config::FwrapConfig;
use crate::Result;

#[derive(Debug, Clone, Args)]
pub struct GenArgs {
    /// Interface description (JSON list of procedures)
    pub input: PathBuf,

    /// Extension module name
    #[arg(short, long)]
    pub name: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub outdir: PathBuf,

    /// Reuse a type spec written by `fwrap probe` instead of probing
    #[arg(long)]
    pub type_spec: Option<PathBuf>,

    /// Fortran compiler used for probing
    #[arg(long)]
    pub compiler: Option<String>,
}

pub fn gen_command(args: GenArgs, config: &FwrapConfig) -> Result<()> {
    let procs = load_procedures(&args.input)?;
    let catalog = match &args.type_spec {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read type spec {}", path.display()))?;
            info!("Using type spec {}", path.display());
            TypeCatalog::from_json(&text)?
        }
        None => resolve(&procs, config, args.compiler.as_deref())?,
    };

    let artifacts = Generator::new(&catalog, TypeTables::standard(), &config.output)
        .generate(&procs, &args.name)?;
    write_artifacts(&artifacts, &args.outdir)?;
    info!(
        "Wrote {} files to {}",
        artifacts.files.len(),
        args.outdir.display()
    );
    Ok(())
}

/// Writes every artifact into a staging directory beside `outdir`, then
/// moves the files into place. A failed write leaves `outdir` untouched.
pub fn write_artifacts(artifacts: &Artifacts, outdir: &Path) -> Result<()> {
    let parent = match outdir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
    let staging = tempfile::Builder::new()
        .prefix(".fwrap-")
        .tempdir_in(parent)
        .wrap_err_with(|| format!("Failed to create a staging directory in {}", parent.display()))?;
    for (name, text) in &artifacts.files {
        let path = staging.path().join(name);
        std::fs::write(&path, text)
            .wrap_err_with(|| format!("Failed to write {}", outdir.join(name).display()))?;
    }
    debug!("Staged {} files in {}", artifacts.files.len(), staging.path().display());

    if !outdir.exists() {
        std::fs::rename(staging.path(), outdir)
            .wrap_err_with(|| format!("Failed to move artifacts to {}", outdir.display()))?;
        return Ok(());
    }
    for (name, _) in &artifacts.files {
        let target = outdir.join(name);
        std::fs::rename(staging.path().join(name), &target)
            .wrap_err_with(|| format!("Failed to move {}", target.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn artifacts(files: &[(&str, &str)]) -> Artifacts {
        Artifacts {
            files: files
                .iter()
                .map(|(name, text)| (name.to_string(), text.to_string()))
                .collect(),
        }
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn writes_into_new_directory() {
        let temp_dir = TempDir::new().unwrap();
        let outdir = temp_dir.path().join("build");
        write_artifacts(&artifacts(&[("a.f90", "A"), ("a.h", "H")]), &outdir).unwrap();
        assert_eq!(entries(&outdir), vec!["a.f90", "a.h"]);
        assert_eq!(std::fs::read_to_string(outdir.join("a.h")).unwrap(), "H");
        assert_eq!(entries(temp_dir.path()), vec!["build"]);
    }

    #[test]
    fn replaces_files_in_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let outdir = temp_dir.path().join("build");
        std::fs::create_dir(&outdir).unwrap();
        std::fs::write(outdir.join("a.f90"), "old").unwrap();
        std::fs::write(outdir.join("keep.txt"), "keep").unwrap();

        write_artifacts(&artifacts(&[("a.f90", "new")]), &outdir).unwrap();
        assert_eq!(std::fs::read_to_string(outdir.join("a.f90")).unwrap(), "new");
        assert_eq!(entries(&outdir), vec!["a.f90", "keep.txt"]);
        assert_eq!(entries(temp_dir.path()), vec!["build"]);
    }

    #[test]
    fn failed_write_leaves_no_files() {
        let temp_dir = TempDir::new().unwrap();
        let outdir = temp_dir.path().join("build");
        let files = artifacts(&[("a.f90", "A"), ("missing/a.h", "H")]);

        let err = write_artifacts(&files, &outdir).unwrap_err();
        assert!(err.to_string().contains("a.h"));
        assert!(!outdir.exists());
        assert!(entries(temp_dir.path()).is_empty());
    }
}
