//! Typestate runner: spawn one child, wait for it, time it.

use pk_common::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::io;
use std::process::{Child, Command};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::types::{RunResult, RunState, Termination};

// ── Phase marker trait ──────────────────────────────────────────────────

/// Marker trait for runner phases. Sealed to prevent external implementation.
pub trait RunPhase: sealed::Sealed {
    /// The corresponding runtime `RunState` variant.
    fn runtime_state() -> RunState;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Created {}
    impl Sealed for super::Spawned {}
}

/// Command assembled, nothing started yet.
#[derive(Debug)]
pub struct Created {
    args: Vec<OsString>,
}

/// Child running; the clock has started.
#[derive(Debug)]
pub struct Spawned {
    child: Child,
    started: Instant,
}

impl RunPhase for Created {
    fn runtime_state() -> RunState {
        RunState::Created
    }
}

impl RunPhase for Spawned {
    fn runtime_state() -> RunState {
        RunState::Spawned
    }
}

// ── Runner ──────────────────────────────────────────────────────────────

/// A single child process under supervision.
#[derive(Debug)]
pub struct SupervisedRunner<P: RunPhase> {
    program: OsString,
    phase: P,
}

impl<P: RunPhase> SupervisedRunner<P> {
    pub fn state(&self) -> RunState {
        P::runtime_state()
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }
}

impl SupervisedRunner<Created> {
    /// Prepare `program` with `args`. The program is resolved through `PATH`
    /// when it contains no slash.
    pub fn new<S, I, A>(program: S, args: I) -> Self
    where
        S: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            phase: Created {
                args: args.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Start the clock and spawn the child with inherited stdio.
    ///
    /// A program that cannot be found or executed yields
    /// [`Error::ExecFailed`]; the spawn facility reports exec errors from
    /// the child over a close-on-exec channel, so this never masquerades as
    /// an exit code. Other failures yield [`Error::Spawn`].
    pub fn spawn(self) -> Result<SupervisedRunner<Spawned>> {
        let started = Instant::now();
        let child = Command::new(&self.program)
            .args(&self.phase.args)
            .spawn()
            .map_err(|e| spawn_error(&self.program, e))?;

        debug!(
            pid = child.id(),
            program = %self.program.to_string_lossy(),
            state = %RunState::Spawned,
            "child spawned"
        );
        Ok(SupervisedRunner {
            program: self.program,
            phase: Spawned { child, started },
        })
    }
}

impl SupervisedRunner<Spawned> {
    pub fn pid(&self) -> u32 {
        self.phase.child.id()
    }

    /// Block until the child terminates, then stop the clock and classify.
    ///
    /// There is no timeout; the wait ends only when the child does.
    pub fn wait(self) -> Result<RunResult> {
        let Spawned { mut child, started } = self.phase;
        let pid = child.id();

        debug!(pid, state = %RunState::Waiting, "waiting for child");
        let status = child.wait().map_err(|source| Error::Wait { pid, source })?;
        let finished = Instant::now();

        let elapsed = finished.checked_duration_since(started).ok_or(Error::Clock)?;
        let termination = Termination::from_status(status);
        let core_dumped = core_dumped(&status);
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        match termination {
            Termination::Exited(code) => info!(pid, code, elapsed_ms, "child exited"),
            Termination::Signaled(signal) => {
                info!(pid, signal, core_dumped, elapsed_ms, "child killed by signal")
            }
            Termination::Unknown => warn!(pid, ?status, "unrecognized wait status"),
        }
        debug!(pid, state = %RunState::Terminated, "run complete");

        Ok(RunResult {
            pid,
            elapsed,
            termination,
            core_dumped,
        })
    }
}

/// Spawn `program` with `args`, wait for it, and report the outcome.
pub fn run<S, I, A>(program: S, args: I) -> Result<RunResult>
where
    S: Into<OsString>,
    I: IntoIterator<Item = A>,
    A: Into<OsString>,
{
    SupervisedRunner::new(program, args).spawn()?.wait()
}

fn spawn_error(program: &OsStr, source: io::Error) -> Error {
    let command = program.to_string_lossy().into_owned();
    if is_exec_failure(&source) {
        Error::ExecFailed { command, source }
    } else {
        Error::Spawn { command, source }
    }
}

fn is_exec_failure(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    ) || matches!(
        err.raw_os_error(),
        Some(libc::ENOEXEC | libc::ENOTDIR | libc::ELOOP | libc::ENAMETOOLONG | libc::ETXTBSY)
    )
}

#[cfg(unix)]
fn core_dumped(status: &std::process::ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.core_dumped()
}

#[cfg(not(unix))]
fn core_dumped(_status: &std::process::ExitStatus) -> bool {
    false
}
