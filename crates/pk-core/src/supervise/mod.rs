//! Supervised execution of a single child process.
//!
//! A runner moves through `Created → Spawned → Waiting → Terminated`. The
//! typestate in [`runner`] makes the only legal order the only one that
//! compiles; [`RunState`] names the phases at runtime for logging.

pub mod runner;
pub mod types;

pub use runner::{run, Created, RunPhase, Spawned, SupervisedRunner};
pub use types::{RunResult, RunState, Termination, UNKNOWN_TERMINATION_CODE};
