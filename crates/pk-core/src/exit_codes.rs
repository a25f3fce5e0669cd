//! Exit codes for the `procinfo` and `runwait` binaries.
//!
//! The exit status reflects the tool's own health, never the status of a
//! supervised child.

use pk_common::Error;

/// Exit codes for tool invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Report produced.
    Clean = 0,

    /// Usage, read, parse, spawn, wait, or clock failure.
    Failure = 1,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }
}

impl From<&Error> for ExitCode {
    fn from(_err: &Error) -> Self {
        ExitCode::Failure
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}
