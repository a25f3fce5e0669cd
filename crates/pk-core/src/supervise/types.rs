//! Result types for supervised runs.

use pk_common::{OutputFormat, Result, SCHEMA_VERSION};
use serde::Serialize;
use std::fmt;
use std::process::ExitStatus;
use std::time::Duration;

/// Exit code reported when the child's status is neither an exit nor a signal.
pub const UNKNOWN_TERMINATION_CODE: i32 = 1;

/// Runtime name of a runner phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Created,
    Spawned,
    Waiting,
    Terminated,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Created => "created",
            RunState::Spawned => "spawned",
            RunState::Waiting => "waiting",
            RunState::Terminated => "terminated",
        };
        write!(f, "{}", s)
    }
}

/// How the child terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Exited normally with this code (0-255).
    Exited(i32),
    /// Killed by this signal number.
    Signaled(i32),
    /// Any other wait status shape.
    Unknown,
}

impl Termination {
    /// Classify a wait status.
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Termination::Exited(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Termination::Signaled(signal);
            }
        }
        Termination::Unknown
    }
}

/// Outcome of one supervised run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub pid: u32,
    /// Monotonic time from just before spawn to just after wait returned.
    pub elapsed: Duration,
    pub termination: Termination,
    /// Whether a signaled child left a core dump.
    pub core_dumped: bool,
}

impl RunResult {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Render in the requested format, without a trailing newline.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string(&self.to_json())?),
        }
    }

    fn to_json(&self) -> RunJson {
        let termination = match self.termination {
            Termination::Exited(code) => TerminationJson::Exited { code },
            Termination::Signaled(signal) => TerminationJson::Signaled {
                signal,
                core_dumped: self.core_dumped,
            },
            Termination::Unknown => TerminationJson::Unknown {
                code: UNKNOWN_TERMINATION_CODE,
            },
        };
        RunJson {
            schema_version: SCHEMA_VERSION,
            pid: self.pid,
            elapsed_seconds: self.elapsed_seconds(),
            termination,
        }
    }
}

/// `pid=<id> elapsed=<secs> exit=<code>` or `... signal=<num>`.
impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pid={} elapsed={:.3} ", self.pid, self.elapsed_seconds())?;
        match self.termination {
            Termination::Exited(code) => write!(f, "exit={code}"),
            Termination::Signaled(signal) => write!(f, "signal={signal}"),
            Termination::Unknown => write!(f, "exit={UNKNOWN_TERMINATION_CODE}"),
        }
    }
}

#[derive(Serialize)]
struct RunJson {
    schema_version: &'static str,
    pid: u32,
    elapsed_seconds: f64,
    termination: TerminationJson,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TerminationJson {
    Exited { code: i32 },
    Signaled { signal: i32, core_dumped: bool },
    Unknown { code: i32 },
}
