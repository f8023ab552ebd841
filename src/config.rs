//! Configuration for hzk-compact.
//!
//! Values come from, in increasing priority: built-in defaults, the TOML config
//! file (`--config <PATH>` or `<config dir>/hzk-compact/config.toml`), and
//! command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CompactError;
use crate::pipeline::CompactOptions;
use crate::table::Layout;

/// Project-relative path of the generated table.
pub const DEFAULT_INPUT: &str = "Resources/Font/src/hzk16.c";
/// Project-relative path of the compacted table.
pub const DEFAULT_OUTPUT: &str = "Resources/Font/src/hzk16_optimized.c";
/// File name of the backup, placed next to the output unless configured.
pub const DEFAULT_BACKUP_NAME: &str = "hzk16_original.bak";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub table: TableConfig,
    pub format: FormatConfig,
    pub backup: BackupConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Backup location; `<output dir>/hzk16_original.bak` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            backup: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Array name to compact; the first table declaration when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Spaces before each entry in the rewritten body
    pub indent: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Copy the input before writing the output
    pub enabled: bool,
    /// Abort when the backup cannot be written
    pub required: bool,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            required: true,
        }
    }
}

impl Config {
    /// Default config file location (`<config dir>/hzk-compact/config.toml`).
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hzk-compact").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// if present, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CompactError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::config_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, CompactError> {
        let content = fs::read_to_string(path).map_err(|e| CompactError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|message| CompactError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.message().to_string())
    }

    /// Where the backup of the input is written.
    pub fn backup_path(&self) -> PathBuf {
        match &self.paths.backup {
            Some(path) => path.clone(),
            None => self
                .paths
                .output
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(DEFAULT_BACKUP_NAME),
        }
    }

    /// Options for the pure compaction pipeline.
    pub fn compact_options(&self) -> CompactOptions {
        CompactOptions {
            table_name: self.table.name.clone(),
            layout: Layout::with_indent(self.format.indent),
        }
    }
}
