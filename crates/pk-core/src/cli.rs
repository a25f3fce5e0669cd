//! Argument handling shared by both binaries.

use clap::{error::ErrorKind, Args, Parser};
use pk_common::{Error, OutputFormat};
use pk_config::{resolve_output_settings, resolve_settings, Settings, SettingsOverrides};
use std::path::PathBuf;

use crate::exit_codes::ExitCode;
use crate::logging::{init_logging, LogFormat};

/// Options accepted by every binary.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Increase log verbosity (-v debug, -vv trace); logs go to stderr
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line encoding
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Report format on stdout
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// JSON settings file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

impl CommonArgs {
    /// Install logging for this invocation.
    pub fn init_logging(&self) {
        init_logging(self.verbose, self.log_format);
    }

    /// Overrides carried by the common flags alone.
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            config: self.config.clone(),
            format: self.format,
            ..Default::default()
        }
    }
}

/// Resolve settings, lifting config errors into the common taxonomy.
pub fn load_settings(overrides: &SettingsOverrides) -> Result<Settings, Error> {
    Ok(resolve_settings(overrides)?)
}

/// Resolve only the settings file and output format.
pub fn load_output_settings(overrides: &SettingsOverrides) -> Result<Settings, Error> {
    Ok(resolve_output_settings(overrides)?)
}

/// Parse `T` from the process arguments.
///
/// `--help` and `--version` exit 0 as usual; every other parse failure
/// prints clap's diagnostic and usage to stderr and exits 1.
pub fn parse_args<T: Parser>() -> T {
    match T::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(ExitCode::Failure.as_i32());
        }
    }
}

/// Write a fatal diagnostic to stderr and return the exit code to use.
pub fn report_error(err: &Error, log_format: LogFormat) -> ExitCode {
    tracing::debug!(code = err.code(), kind = err.kind(), "invocation failed");
    match log_format {
        LogFormat::Text => eprintln!("Error: {err}"),
        LogFormat::Json => eprintln!(
            "{}",
            serde_json::json!({
                "error": {
                    "code": err.code(),
                    "kind": err.kind(),
                    "message": err.to_string(),
                }
            })
        ),
    }
    ExitCode::from(err)
}
