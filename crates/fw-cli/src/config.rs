//! fwrap configuration: toolchain selection and artifact names.

use std::path::{Path, PathBuf};

use fw_core::ArtifactNames;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CliError, Result};

/// Name of the project-local configuration file.
pub const LOCAL_CONFIG: &str = "fwrap.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FwrapConfig {
    pub toolchain: ToolchainConfig,
    /// Names of the shared kind artifacts.
    pub output: ArtifactNames,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Fortran compiler, a path or a name on `PATH`. The first known
    /// compiler on `PATH` is used when unset.
    pub compiler: Option<String>,

    /// Extra flags passed to every probe compile.
    pub flags: Vec<String>,
}

impl FwrapConfig {
    /// Loads the given file, or layers the user config and then the
    /// project-local `fwrap.toml` over the defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let mut config = Self::default();
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                config = config.merge(Self::load_from_file(&path)?);
            }
        }
        let local = Path::new(LOCAL_CONFIG);
        if local.exists() {
            config = config.merge(Self::load_from_file(local)?);
        }
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            CliError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Overlays `other` on `self`: set toolchain fields and non-default
    /// artifact names of `other` win.
    pub fn merge(self, other: Self) -> Self {
        let defaults = ArtifactNames::default();
        let pick = |mine: String, theirs: String, default: &str| {
            if theirs != default {
                theirs
            } else {
                mine
            }
        };
        Self {
            toolchain: ToolchainConfig {
                compiler: other.toolchain.compiler.or(self.toolchain.compiler),
                flags: if other.toolchain.flags.is_empty() {
                    self.toolchain.flags
                } else {
                    other.toolchain.flags
                },
            },
            output: ArtifactNames {
                kind_module: pick(
                    self.output.kind_module,
                    other.output.kind_module,
                    &defaults.kind_module,
                ),
                header: pick(self.output.header, other.output.header, &defaults.header),
                binding_module: pick(
                    self.output.binding_module,
                    other.output.binding_module,
                    &defaults.binding_module,
                ),
                type_spec: pick(
                    self.output.type_spec,
                    other.output.type_spec,
                    &defaults.type_spec,
                ),
            },
        }
    }

    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fwrap").join("config.toml"))
    }
}
