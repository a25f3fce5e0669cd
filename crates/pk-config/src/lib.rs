//! Settings for the process inspection tools.
//!
//! This crate provides:
//! - A typed `Settings` struct with built-in defaults
//! - JSON settings file loading
//! - Layered resolution (CLI → env → settings file → defaults)
//! - Semantic validation

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{
    resolve_output_settings, resolve_output_settings_with, resolve_settings,
    resolve_settings_with, SettingsOverrides,
};
pub use settings::Settings;
pub use validate::ConfigError;

/// Environment variable naming a JSON settings file.
pub const ENV_CONFIG: &str = "PK_CONFIG";
/// Environment variable overriding the process table root.
pub const ENV_PROC_ROOT: &str = "PK_PROC_ROOT";
/// Environment variable overriding the argument-vector read limit.
pub const ENV_CMDLINE_LIMIT: &str = "PK_CMDLINE_LIMIT";
/// Environment variable overriding the output format.
pub const ENV_FORMAT: &str = "PK_FORMAT";
