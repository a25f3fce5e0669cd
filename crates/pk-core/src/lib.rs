//! Process table inspection and supervised command execution.
//!
//! Two independent tools share this library:
//! - `procinfo` reads a process's stat, status, and cmdline records and
//!   renders a fixed-format report ([`report`], [`collect`]).
//! - `runwait` spawns a command, waits for it, and reports elapsed
//!   monotonic time and how it terminated ([`supervise`]).

pub mod cli;
pub mod collect;
pub mod exit_codes;
pub mod logging;
pub mod report;
pub mod supervise;

pub use exit_codes::ExitCode;
pub use pk_common::{Error, ProcessId, Result};
