//! Layered settings resolution: CLI → env → settings file → defaults.

use pk_common::OutputFormat;
use std::path::PathBuf;
use tracing::debug;

use crate::settings::Settings;
use crate::validate::{validate, ConfigError};
use crate::{ENV_CMDLINE_LIMIT, ENV_CONFIG, ENV_FORMAT, ENV_PROC_ROOT};

/// Values supplied on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub config: Option<PathBuf>,
    pub proc_root: Option<PathBuf>,
    pub cmdline_limit: Option<usize>,
    pub format: Option<OutputFormat>,
}

/// Which settings the caller consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Every field, including the process table knobs.
    Full,
    /// Only the settings file and output format; `proc_root` and
    /// `cmdline_limit` keep their file or default values unvalidated.
    Output,
}

/// Resolve settings against the real process environment.
pub fn resolve_settings(overrides: &SettingsOverrides) -> Result<Settings, ConfigError> {
    resolve_settings_with(overrides, |key| std::env::var(key).ok())
}

/// Resolve settings using `env` to look up environment variables.
pub fn resolve_settings_with<F>(
    overrides: &SettingsOverrides,
    env: F,
) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    resolve(overrides, env, Scope::Full)
}

/// Resolve only the settings file and output format, for callers that
/// never read the process table.
pub fn resolve_output_settings(overrides: &SettingsOverrides) -> Result<Settings, ConfigError> {
    resolve_output_settings_with(overrides, |key| std::env::var(key).ok())
}

/// Like [`resolve_output_settings`] using `env` to look up environment variables.
pub fn resolve_output_settings_with<F>(
    overrides: &SettingsOverrides,
    env: F,
) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    resolve(overrides, env, Scope::Output)
}

fn resolve<F>(
    overrides: &SettingsOverrides,
    env: F,
    scope: Scope,
) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config_path = overrides
        .config
        .clone()
        .or_else(|| non_empty(env(ENV_CONFIG)).map(PathBuf::from));

    let mut settings = match &config_path {
        Some(path) => {
            debug!(path = %path.display(), "loading settings file");
            Settings::from_file(path)?
        }
        None => Settings::default(),
    };

    if scope == Scope::Full {
        apply_proc_env(&mut settings, &env)?;
    }
    if let Some(raw) = non_empty(env(ENV_FORMAT)) {
        settings.format = raw
            .parse()
            .map_err(|reason| ConfigError::InvalidValue {
                field: ENV_FORMAT.to_string(),
                reason,
            })?;
    }

    if let Some(format) = overrides.format {
        settings.format = format;
    }
    if scope == Scope::Output {
        debug!(format = %settings.format, "output settings resolved");
        return Ok(settings);
    }

    if let Some(root) = &overrides.proc_root {
        settings.proc_root = root.clone();
    }
    if let Some(limit) = overrides.cmdline_limit {
        settings.cmdline_limit = limit;
    }

    validate(&settings)?;
    debug!(
        proc_root = %settings.proc_root.display(),
        cmdline_limit = settings.cmdline_limit,
        format = %settings.format,
        "settings resolved"
    );
    Ok(settings)
}

fn apply_proc_env<F>(settings: &mut Settings, env: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(root) = non_empty(env(ENV_PROC_ROOT)) {
        settings.proc_root = PathBuf::from(root);
    }
    if let Some(raw) = non_empty(env(ENV_CMDLINE_LIMIT)) {
        settings.cmdline_limit = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            field: ENV_CMDLINE_LIMIT.to_string(),
            reason: format!("'{raw}' is not a byte count"),
        })?;
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
