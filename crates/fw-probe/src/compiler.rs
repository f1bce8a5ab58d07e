//! Runs the probe program through a Fortran compiler.

use std::path::{Path, PathBuf};
use std::process::Command;

use fw_core::{FcType, KindProbe, ProbeFailure, ProbeRequest};
use tracing::{debug, info, warn};

use crate::error::{ProbeError, Result};
use crate::program;

/// Compilers tried, in order, when none is configured.
pub const KNOWN_COMPILERS: [&str; 5] = ["gfortran", "flang-new", "flang", "ifx", "ifort"];

/// Kind probe backed by a Fortran compiler.
#[derive(Debug, Clone)]
pub struct FortranProbe {
    compiler: PathBuf,
    flags: Vec<String>,
}

impl FortranProbe {
    /// Finds the first known compiler on `PATH`.
    pub fn new() -> Result<Self> {
        let compiler = KNOWN_COMPILERS
            .iter()
            .find_map(|name| which::which(name).ok())
            .ok_or_else(|| ProbeError::CompilerNotFound(KNOWN_COMPILERS.join(", ")))?;

        info!("Found Fortran compiler at: {}", compiler.display());
        Ok(Self {
            compiler,
            flags: Vec::new(),
        })
    }

    /// Uses the given compiler, either a path or a name looked up on `PATH`.
    pub fn with_path(compiler: impl AsRef<Path>) -> Result<Self> {
        let compiler = compiler.as_ref();
        let resolved = if compiler.components().count() > 1 {
            if !compiler.exists() {
                return Err(ProbeError::FileNotFound(compiler.to_path_buf()));
            }
            compiler.to_path_buf()
        } else {
            which::which(compiler).map_err(|e| ProbeError::CompilerNotFound(e.to_string()))?
        };
        Ok(Self {
            compiler: resolved,
            flags: Vec::new(),
        })
    }

    pub fn with_flags(mut self, flags: impl IntoIterator<Item = String>) -> Self {
        self.flags.extend(flags);
        self
    }

    pub fn compiler(&self) -> &Path {
        &self.compiler
    }

    /// Compiles and runs the probe program in a scratch directory.
    pub fn run(&self, requests: &[ProbeRequest]) -> Result<Vec<FcType>> {
        let scratch = tempfile::tempdir()?;
        let source = scratch.path().join(format!("{}.f90", program::PROGRAM_NAME));
        let binary = scratch.path().join(program::PROGRAM_NAME);
        std::fs::write(&source, program::render(requests))?;

        let mut cmd = Command::new(&self.compiler);
        cmd.current_dir(scratch.path());
        for flag in &self.flags {
            cmd.arg(flag);
        }
        cmd.arg("-o").arg(&binary).arg(&source);

        debug!("Running probe compile: {:?}", cmd);
        let output = cmd.output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Probe compilation failed: {}", stderr);
            return Err(ProbeError::CompilationFailed(stderr.to_string()));
        }

        let output = Command::new(&binary).current_dir(scratch.path()).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Probe program failed: {}", stderr);
            return Err(ProbeError::ExecutionFailed(stderr.to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("Probe output:\n{}", stdout);
        program::parse_output(requests, &stdout)
    }
}

impl KindProbe for FortranProbe {
    fn probe(&self, requests: &[ProbeRequest]) -> std::result::Result<Vec<FcType>, ProbeFailure> {
        Ok(self.run(requests)?)
    }
}
