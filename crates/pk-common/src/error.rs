//! Error types for the process inspection tools.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for process inspection operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type.
///
/// Every variant is fatal for the current invocation. Optional fields that
/// are merely absent from an otherwise valid record are modeled as `Option`
/// on the parsed types and never reach this enum.
#[derive(Error, Debug)]
pub enum Error {
    // Invocation errors (10-19)
    #[error("{0}")]
    Usage(String),

    #[error("configuration error: {0}")]
    Config(String),

    // Record access errors (20-29)
    #[error("PID {pid} not found (missing {})", .path.display())]
    ProcessNotFound { pid: String, path: PathBuf },

    #[error("permission denied reading {}", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Record structure errors (30-39)
    #[error("unexpected format in {}: {reason}", .path.display())]
    MalformedRecord { path: PathBuf, reason: String },

    #[error("could not parse {} (got {parsed} fields)", .path.display())]
    IncompleteRecord { path: PathBuf, parsed: usize },

    // Supervision errors (40-49)
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("could not execute '{command}': {source}")]
    ExecFailed {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for child {pid}: {source}")]
    Wait {
        pid: u32,
        #[source]
        source: io::Error,
    },

    #[error("monotonic clock went backwards")]
    Clock,

    // Serialization errors (60-69)
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Usage(_) => 10,
            Error::Config(_) => 11,
            Error::ProcessNotFound { .. } => 20,
            Error::PermissionDenied { .. } => 21,
            Error::Io { .. } => 22,
            Error::MalformedRecord { .. } => 30,
            Error::IncompleteRecord { .. } => 31,
            Error::Spawn { .. } => 40,
            Error::ExecFailed { .. } => 41,
            Error::Wait { .. } => 42,
            Error::Clock => 43,
            Error::Json(_) => 60,
        }
    }

    /// Short machine-readable kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Usage(_) => "usage",
            Error::Config(_) => "config",
            Error::ProcessNotFound { .. } => "not_found",
            Error::PermissionDenied { .. } => "permission_denied",
            Error::Io { .. } => "io",
            Error::MalformedRecord { .. } => "malformed_record",
            Error::IncompleteRecord { .. } => "incomplete_record",
            Error::Spawn { .. } => "spawn",
            Error::ExecFailed { .. } => "exec_failed",
            Error::Wait { .. } => "wait",
            Error::Clock => "clock",
            Error::Json(_) => "json",
        }
    }

    /// Classify an open/read failure on a record belonging to `pid`.
    ///
    /// `ESRCH` shows up when the process exits between open and read, so it
    /// is reported the same way as a missing entry.
    pub fn from_record_io(pid: &str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.raw_os_error() == Some(libc::ESRCH) {
            return Error::ProcessNotFound {
                pid: pid.to_string(),
                path,
            };
        }
        match source.kind() {
            io::ErrorKind::NotFound => Error::ProcessNotFound {
                pid: pid.to_string(),
                path,
            },
            io::ErrorKind::PermissionDenied => Error::PermissionDenied { path },
            _ => Error::Io { path, source },
        }
    }
}
