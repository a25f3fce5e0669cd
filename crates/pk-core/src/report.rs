//! Process report: gathers the three records for one process and renders them.

use pk_common::{OutputFormat, ProcessId, Result, SCHEMA_VERSION};
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::collect::{clock_ticks_per_second, cpu_seconds, ProcReader, ProcStat, ProcStatus};

/// Everything `procinfo` reports about one process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReport {
    pub pid: ProcessId,
    pub stat: ProcStat,
    pub cmdline: String,
    pub status: ProcStatus,
    /// `(utime + stime) / USER_HZ`, or `0.0` if the tick rate is unknown.
    pub cpu_seconds: f64,
}

impl ProcessReport {
    /// Read stat, cmdline, and status for `pid`. Any read or structural
    /// failure aborts; absent optional fields do not.
    pub fn collect(reader: &ProcReader, pid: &ProcessId) -> Result<Self> {
        Self::collect_with_tick_rate(reader, pid, clock_ticks_per_second())
    }

    /// Like [`collect`](Self::collect) with an explicit tick rate.
    pub fn collect_with_tick_rate(
        reader: &ProcReader,
        pid: &ProcessId,
        ticks_per_second: Option<u64>,
    ) -> Result<Self> {
        let stat = reader.read_stat(pid)?;
        let cmdline = reader.read_cmdline(pid)?;
        let status = reader.read_status(pid)?;

        if ticks_per_second.is_none() {
            debug!("clock tick rate unavailable, reporting zero CPU time");
        }
        let cpu_seconds = cpu_seconds(stat.total_ticks(), ticks_per_second);

        Ok(Self {
            pid: pid.clone(),
            stat,
            cmdline,
            status,
            cpu_seconds,
        })
    }

    /// Render in the requested format, without a trailing newline for JSON.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string(&self.to_json())?),
        }
    }

    fn to_json(&self) -> ReportJson<'_> {
        ReportJson {
            schema_version: SCHEMA_VERSION,
            pid: &self.pid,
            state: self.stat.state,
            ppid: self.stat.ppid,
            cmd: &self.cmdline,
            processor: self.stat.processor,
            cpu_seconds: self.cpu_seconds,
            vm_rss_kb: self.status.vm_rss_kb,
        }
    }
}

/// Fixed-label text form. Unknown processor and RSS render as `-1`.
impl fmt::Display for ProcessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PID: {}", self.pid)?;
        writeln!(f, "State: {}", self.stat.state)?;
        writeln!(f, "PPID: {}", self.stat.ppid)?;
        writeln!(f, "Cmd: {}", self.cmdline)?;
        writeln!(
            f,
            "CPU: {} {:.3}",
            sentinel(self.stat.processor.map(i64::from)),
            self.cpu_seconds
        )?;
        writeln!(
            f,
            "VmRSS: {}",
            sentinel(self.status.vm_rss_kb.and_then(|kb| i64::try_from(kb).ok()))
        )
    }
}

fn sentinel(value: Option<i64>) -> i64 {
    value.unwrap_or(-1)
}

#[derive(Serialize)]
struct ReportJson<'a> {
    schema_version: &'static str,
    pid: &'a ProcessId,
    state: char,
    ppid: i64,
    cmd: &'a str,
    processor: Option<u32>,
    cpu_seconds: f64,
    vm_rss_kb: Option<u64>,
}
