//! Parsers for /proc/<pid>/* records (Linux layout).
//!
//! All parsers here are pure: they take the raw record contents and never
//! touch the filesystem, so they can be exercised with synthetic input.

use thiserror::Error;

/// Zero-based index of the `processor` field, counted from the state field
/// (the first token after the command name).
pub const PROCESSOR_FIELD_INDEX: usize = 36;

/// Rendered in place of an empty argument vector (kernel threads, zombies).
pub const EMPTY_CMDLINE: &str = "(empty)";

/// Key of the resident set size line in /proc/<pid>/status.
pub const VM_RSS_KEY: &str = "VmRSS";

/// Errors from parsing /proc/<pid>/stat.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatParseError {
    /// The command-name field is not closed by `") "`.
    #[error("malformed stat record: {0}")]
    Malformed(String),

    /// Fewer than the 13 required leading fields (state through stime)
    /// parsed with their expected types.
    #[error("incomplete stat record: parsed {parsed} of 13 fields")]
    Incomplete { parsed: usize },
}

/// Parsed contents of /proc/<pid>/stat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcStat {
    /// Single-character scheduling state (`R`, `S`, `D`, `Z`, ...).
    pub state: char,
    pub ppid: i64,
    /// User-mode CPU time in clock ticks.
    pub utime: u64,
    /// Kernel-mode CPU time in clock ticks.
    pub stime: u64,
    /// CPU the task last ran on; `None` when the record is too short or the
    /// field is not numeric.
    pub processor: Option<u32>,
}

impl ProcStat {
    /// Total CPU time in clock ticks.
    pub fn total_ticks(&self) -> u64 {
        self.utime.saturating_add(self.stime)
    }
}

/// Parse /proc/<pid>/stat.
///
/// The command name is wrapped in parentheses and may itself contain spaces
/// and parentheses, so the record is split at the *last* `)`. Everything
/// after it is tokenized once; both the fixed leading fields and the
/// `processor` field are read from the same token list.
pub fn parse_proc_stat(content: &str) -> Result<ProcStat, StatParseError> {
    let line = content.lines().next().unwrap_or("");

    let comm_end = line
        .rfind(')')
        .ok_or_else(|| StatParseError::Malformed("no closing ')' after command name".into()))?;
    let rest = line
        .get(comm_end + 1..)
        .and_then(|s| s.strip_prefix(' '))
        .ok_or_else(|| StatParseError::Malformed("expected ' ' after command name".into()))?;

    let tokens: Vec<&str> = rest.split(' ').filter(|t| !t.is_empty()).collect();

    let mut fields = LeadingFields::new(&tokens);
    let state = fields.state()?;
    let ppid = fields.signed()?;
    fields.signed()?; // pgrp
    fields.signed()?; // session
    fields.signed()?; // tty_nr
    fields.signed()?; // tpgid
    fields.unsigned()?; // flags
    fields.unsigned()?; // minflt
    fields.unsigned()?; // cminflt
    fields.unsigned()?; // majflt
    fields.unsigned()?; // cmajflt
    let utime = fields.unsigned()?;
    let stime = fields.unsigned()?;

    let processor = tokens
        .get(PROCESSOR_FIELD_INDEX)
        .and_then(|t| t.parse::<u32>().ok());

    Ok(ProcStat {
        state,
        ppid,
        utime,
        stime,
        processor,
    })
}

/// Sequential reader over the required leading stat fields.
///
/// Counts how many fields parsed so an incomplete record reports where it
/// stopped.
struct LeadingFields<'a> {
    tokens: &'a [&'a str],
    parsed: usize,
}

impl<'a> LeadingFields<'a> {
    fn new(tokens: &'a [&'a str]) -> Self {
        Self { tokens, parsed: 0 }
    }

    fn next_with<T>(&mut self, parse: impl FnOnce(&str) -> Option<T>) -> Result<T, StatParseError> {
        let value = self
            .tokens
            .get(self.parsed)
            .and_then(|t| parse(*t))
            .ok_or(StatParseError::Incomplete {
                parsed: self.parsed,
            })?;
        self.parsed += 1;
        Ok(value)
    }

    fn state(&mut self) -> Result<char, StatParseError> {
        self.next_with(|t| {
            let mut chars = t.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        })
    }

    fn signed(&mut self) -> Result<i64, StatParseError> {
        self.next_with(|t| t.parse().ok())
    }

    fn unsigned(&mut self) -> Result<u64, StatParseError> {
        self.next_with(|t| t.parse().ok())
    }
}

/// Parsed contents of /proc/<pid>/status that the report needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcStatus {
    /// Resident set size in kB. Absent for kernel threads and zombies.
    pub vm_rss_kb: Option<u64>,
}

/// Parse /proc/<pid>/status.
pub fn parse_proc_status(content: &str) -> ProcStatus {
    ProcStatus {
        vm_rss_kb: status_value(content, VM_RSS_KEY),
    }
}

/// Look up the first numeric value for `key` in a `Key:\tvalue` record.
///
/// Only the first line starting with `key:` is considered; leading
/// non-digit characters are skipped and the following decimal run parsed.
/// Returns `None` if the key never appears or carries no number.
pub fn status_value(content: &str, key: &str) -> Option<u64> {
    let line = content.lines().find_map(|line| {
        line.strip_prefix(key)
            .and_then(|after| after.strip_prefix(':'))
    })?;

    let digits: &str = {
        let start = line.find(|c: char| c.is_ascii_digit())?;
        let tail = &line[start..];
        let end = tail
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(tail.len());
        &tail[..end]
    };
    digits.parse().ok()
}

/// Turn a NUL-separated argument vector into a printable string.
///
/// NUL bytes become spaces and trailing spaces are trimmed. An argument
/// vector with nothing printable left renders as [`EMPTY_CMDLINE`].
/// Invalid UTF-8 is replaced rather than rejected.
pub fn normalize_cmdline(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw).replace('\0', " ");
    let trimmed = text.trim_end_matches(' ');
    if trimmed.is_empty() {
        EMPTY_CMDLINE.to_string()
    } else {
        trimmed.to_string()
    }
}
