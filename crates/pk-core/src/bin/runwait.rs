//! `runwait <cmd> [args...]`: run a command, wait for it, report elapsed time and how it ended.

use clap::Parser;
use pk_core::cli::{load_output_settings, parse_args, report_error, CommonArgs};
use pk_core::supervise::SupervisedRunner;
use pk_core::{Error, ExitCode, Result};
use std::ffi::OsString;

/// Run a command to completion and report its pid, elapsed wall-clock time,
/// and exit code or terminating signal. The exit status of runwait itself
/// reflects only whether the run could be supervised.
#[derive(Debug, Parser)]
#[command(name = "runwait", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Command to run, followed by its arguments
    #[arg(
        value_name = "CMD",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<OsString>,
}

fn main() -> std::process::ExitCode {
    let cli: Cli = parse_args();
    cli.common.init_logging();

    match run(&cli) {
        Ok(()) => ExitCode::Clean.into(),
        Err(err) => report_error(&err, cli.common.log_format).into(),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let (program, args) = cli
        .command
        .split_first()
        .ok_or_else(|| Error::Usage("missing command".to_string()))?;
    let settings = load_output_settings(&cli.common.overrides())?;

    let result = SupervisedRunner::new(program.clone(), args.iter().cloned())
        .spawn()?
        .wait()?;

    println!("{}", result.render(settings.format)?);
    Ok(())
}
