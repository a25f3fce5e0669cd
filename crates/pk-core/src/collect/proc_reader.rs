//! Scoped reads of the three per-process records under a process table root.
//!
//! Every read opens, consumes, and drops its handle inside one call, so no
//! descriptor outlives a failed read.

use pk_common::{Error, ProcessId, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::proc_parsers::{
    normalize_cmdline, parse_proc_stat, parse_proc_status, ProcStat, ProcStatus, StatParseError,
};

/// Reads per-process records beneath a process table root (normally `/proc`).
#[derive(Debug, Clone)]
pub struct ProcReader {
    root: PathBuf,
    cmdline_limit: usize,
}

impl ProcReader {
    pub fn new(root: impl Into<PathBuf>, cmdline_limit: usize) -> Self {
        Self {
            root: root.into(),
            cmdline_limit: cmdline_limit.max(1),
        }
    }

    /// Reader over `settings.proc_root` honoring `settings.cmdline_limit`.
    pub fn from_settings(settings: &pk_config::Settings) -> Self {
        Self::new(&settings.proc_root, settings.cmdline_limit)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `name` for `pid`, e.g. `/proc/42/stat`.
    pub fn record_path(&self, pid: &ProcessId, name: &str) -> PathBuf {
        self.root.join(pid.as_str()).join(name)
    }

    /// Read and parse `<root>/<pid>/stat`.
    pub fn read_stat(&self, pid: &ProcessId) -> Result<ProcStat> {
        let path = self.record_path(pid, "stat");
        let content = self.read_text(pid, &path)?;
        if content.is_empty() {
            return Err(Error::MalformedRecord {
                path,
                reason: "empty record".to_string(),
            });
        }

        let stat = parse_proc_stat(&content).map_err(|e| match e {
            StatParseError::Malformed(reason) => Error::MalformedRecord {
                path: path.clone(),
                reason,
            },
            StatParseError::Incomplete { parsed } => Error::IncompleteRecord {
                path: path.clone(),
                parsed,
            },
        })?;
        trace!(
            %pid,
            state = %stat.state,
            ppid = stat.ppid,
            processor = ?stat.processor,
            "stat parsed"
        );
        Ok(stat)
    }

    /// Read and parse `<root>/<pid>/status`.
    pub fn read_status(&self, pid: &ProcessId) -> Result<ProcStatus> {
        let path = self.record_path(pid, "status");
        let content = self.read_text(pid, &path)?;
        let status = parse_proc_status(&content);
        if status.vm_rss_kb.is_none() {
            debug!(%pid, "status has no VmRSS line");
        }
        Ok(status)
    }

    /// Read `<root>/<pid>/cmdline` (at most `cmdline_limit` bytes) and normalize it.
    pub fn read_cmdline(&self, pid: &ProcessId) -> Result<String> {
        let path = self.record_path(pid, "cmdline");
        let file = File::open(&path).map_err(|e| Error::from_record_io(pid.as_str(), &path, e))?;

        let (raw, truncated) = read_bounded(file, self.cmdline_limit)
            .map_err(|e| Error::from_record_io(pid.as_str(), &path, e))?;
        if truncated {
            debug!(%pid, limit = self.cmdline_limit, "cmdline truncated at limit");
        }
        Ok(normalize_cmdline(&raw))
    }

    fn read_text(&self, pid: &ProcessId, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| Error::from_record_io(pid.as_str(), path, e))?;
        trace!(path = %path.display(), len = bytes.len(), "record read");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Read at most `limit` bytes. The flag is set only when more data followed.
fn read_bounded(source: impl Read, limit: usize) -> io::Result<(Vec<u8>, bool)> {
    let read_len = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut raw = Vec::new();
    source.take(read_len).read_to_end(&mut raw)?;

    let truncated = raw.len() > limit;
    raw.truncate(limit);
    Ok((raw, truncated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const STAT: &str = concat!(
        "77 (worker (x)) R 1 77 77 0 -1 4194304 10 0 0 0 250 50 0 0 20 0 1 0 100 1000 10 ",
        "18446744073709551615 1 1 0 0 0 0 0 0 0 0 0 0 17 5 0 0 0 0 0\n",
    );

    fn fixture(
        pid: &str,
        stat: Option<&str>,
        status: Option<&str>,
        cmdline: Option<&[u8]>,
    ) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let pdir = dir.path().join(pid);
        fs::create_dir_all(&pdir).unwrap();
        if let Some(s) = stat {
            fs::write(pdir.join("stat"), s).unwrap();
        }
        if let Some(s) = status {
            fs::write(pdir.join("status"), s).unwrap();
        }
        if let Some(c) = cmdline {
            fs::write(pdir.join("cmdline"), c).unwrap();
        }
        dir
    }

    #[test]
    fn reads_all_three_records() {
        let dir = fixture(
            "77",
            Some(STAT),
            Some("Name:\tworker\nVmRSS:\t 2048 kB\n"),
            Some(b"worker\0--fast\0"),
        );
        let reader = ProcReader::new(dir.path(), 4096);
        let pid = ProcessId::parse("77").unwrap();

        let stat = reader.read_stat(&pid).unwrap();
        assert_eq!(stat.state, 'R');
        assert_eq!(stat.utime, 250);
        assert_eq!(stat.processor, Some(5));
        assert_eq!(reader.read_status(&pid).unwrap().vm_rss_kb, Some(2048));
        assert_eq!(reader.read_cmdline(&pid).unwrap(), "worker --fast");
    }

    #[test]
    fn missing_pid_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let reader = ProcReader::new(dir.path(), 4096);
        let pid = ProcessId::parse("999").unwrap();
        let err = reader.read_stat(&pid).unwrap_err();
        assert!(matches!(err, Error::ProcessNotFound { .. }), "{err:?}");
    }

    #[test]
    fn empty_stat_is_malformed() {
        let dir = fixture("5", Some(""), None, None);
        let reader = ProcReader::new(dir.path(), 4096);
        let err = reader.read_stat(&ProcessId::from(5)).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { .. }));
    }

    #[test]
    fn short_stat_is_incomplete() {
        let dir = fixture("5", Some("5 (a) S 1 2\n"), None, None);
        let reader = ProcReader::new(dir.path(), 4096);
        let err = reader.read_stat(&ProcessId::from(5)).unwrap_err();
        assert!(matches!(err, Error::IncompleteRecord { parsed: 3, .. }), "{err:?}");
    }

    #[test]
    fn cmdline_is_truncated_at_limit() {
        let dir = fixture("5", None, None, Some(b"abcdefgh\0ijk\0"));
        let reader = ProcReader::new(dir.path(), 4);
        assert_eq!(reader.read_cmdline(&ProcessId::from(5)).unwrap(), "abcd");
    }

    #[test]
    fn bounded_read_flags_only_real_truncation() {
        let (raw, truncated) = read_bounded(&b"abcd"[..], 4).unwrap();
        assert_eq!(raw, b"abcd");
        assert!(!truncated);

        let (raw, truncated) = read_bounded(&b"abcde"[..], 4).unwrap();
        assert_eq!(raw, b"abcd");
        assert!(truncated);

        let (raw, truncated) = read_bounded(&b"ab"[..], 4).unwrap();
        assert_eq!(raw, b"ab");
        assert!(!truncated);
    }

    #[test]
    fn cmdline_of_exactly_limit_bytes_is_whole() {
        let dir = fixture("5", None, None, Some(b"abc\0"));
        let reader = ProcReader::new(dir.path(), 4);
        assert_eq!(reader.read_cmdline(&ProcessId::from(5)).unwrap(), "abc");
    }

    #[test]
    fn empty_cmdline_is_placeholder() {
        let dir = fixture("5", None, None, Some(b""));
        let reader = ProcReader::new(dir.path(), 16);
        assert_eq!(reader.read_cmdline(&ProcessId::from(5)).unwrap(), "(empty)");
    }

    #[cfg(target_os = "linux")]
    mod linux_tests {
        use super::*;

        #[test]
        fn reads_own_process() {
            let reader = ProcReader::new("/proc", 1 << 20);
            let pid = ProcessId::from(std::process::id());
            let stat = reader.read_stat(&pid).unwrap();
            assert!(stat.state.is_ascii_alphabetic());
            assert!(stat.ppid >= 0);
            assert!(reader.read_status(&pid).unwrap().vm_rss_kb.is_some());
            assert_ne!(reader.read_cmdline(&pid).unwrap(), "(empty)");
        }
    }
}
