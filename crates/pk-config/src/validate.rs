//! Settings validation.

use thiserror::Error;

use crate::settings::Settings;

/// Errors raised while loading or validating settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<ConfigError> for pk_common::Error {
    fn from(err: ConfigError) -> Self {
        pk_common::Error::Config(err.to_string())
    }
}

/// Check semantic constraints that serde cannot express.
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.cmdline_limit == 0 {
        return Err(ConfigError::InvalidValue {
            field: "cmdline_limit".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if settings.proc_root.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "proc_root".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}
