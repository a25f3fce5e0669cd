//! Typed settings and their defaults.

use pk_common::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::validate::ConfigError;

/// Default mount point of the process table.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Default cap on bytes read from a process's argument vector.
///
/// Reads stop silently at this many bytes; memory use stays bounded even
/// for processes with pathological command lines.
pub const DEFAULT_CMDLINE_LIMIT: usize = 1024 * 1024;

/// Resolved settings shared by both programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Root of the process table mount.
    #[serde(default = "default_proc_root")]
    pub proc_root: PathBuf,

    /// Maximum bytes read from `<proc_root>/<pid>/cmdline`.
    #[serde(default = "default_cmdline_limit")]
    pub cmdline_limit: usize,

    /// Report format on stdout.
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_proc_root() -> PathBuf {
    PathBuf::from(DEFAULT_PROC_ROOT)
}

fn default_cmdline_limit() -> usize {
    DEFAULT_CMDLINE_LIMIT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            proc_root: default_proc_root(),
            cmdline_limit: default_cmdline_limit(),
            format: OutputFormat::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_json(&content)
    }

    /// Parse settings from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json)
            .map_err(|e| ConfigError::ParseError(format!("Invalid JSON: {}", e)))
    }
}
