//! `procinfo <pid>`: print state, parentage, command line, CPU, and RSS for one process.

use clap::Parser;
use pk_core::cli::{load_settings, parse_args, report_error, CommonArgs};
use pk_core::collect::ProcReader;
use pk_core::report::ProcessReport;
use pk_core::{Error, ExitCode, ProcessId, Result};
use std::path::PathBuf;
use tracing::debug;

const USAGE: &str = "Usage: procinfo [OPTIONS] <PID>";

/// Report scheduling state, parent, command line, CPU time, and resident
/// memory for a process, read from the process table.
#[derive(Debug, Parser)]
#[command(name = "procinfo", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Process table root (defaults to /proc)
    #[arg(long, value_name = "DIR")]
    proc_root: Option<PathBuf>,

    /// Maximum bytes read from the process's argument vector
    #[arg(long, value_name = "BYTES")]
    cmdline_limit: Option<usize>,

    /// Process identifier (decimal digits only)
    #[arg(value_name = "PID")]
    pid: String,
}

fn main() -> std::process::ExitCode {
    let cli: Cli = parse_args();
    cli.common.init_logging();

    match run(&cli) {
        Ok(()) => ExitCode::Clean.into(),
        Err(err) => {
            let code = report_error(&err, cli.common.log_format);
            if matches!(err, Error::Usage(_)) {
                eprintln!("{USAGE}");
            }
            code.into()
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let pid = ProcessId::parse(&cli.pid)?;

    let mut overrides = cli.common.overrides();
    overrides.proc_root = cli.proc_root.clone();
    overrides.cmdline_limit = cli.cmdline_limit;
    let settings = load_settings(&overrides)?;

    let reader = ProcReader::from_settings(&settings);
    debug!(%pid, root = %reader.root().display(), "collecting process report");
    let report = ProcessReport::collect(&reader, &pid)?;

    let rendered = report.render(settings.format)?;
    if rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
    Ok(())
}
