//! template-sync CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: At least one template failed, or the run was aborted
//! - 2: Invalid arguments or configuration

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands, RunStatus, UsageError};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const RUN_FAILED: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
}

const DEFAULT_FILTER: &str = "template_store=info,template_sync=info";
const VERBOSE_FILTER: &str = "template_store=debug,template_sync=debug";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Import(args) => commands::import::execute(args).await,
        Commands::Export(args) => commands::export::execute(args).await,
    };

    match result {
        Ok(RunStatus::Completed) => ExitCode::from(ExitCodes::SUCCESS),
        Ok(RunStatus::Incomplete) => ExitCode::from(ExitCodes::RUN_FAILED),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

/// Logs go to stderr so the run summary on stdout stays clean
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if e.chain().any(|cause| cause.is::<UsageError>()) {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::RUN_FAILED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_usage_errors_map_to_invalid_args() {
        let err = anyhow::Error::new(UsageError("Config file not found: x".into()));
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);

        let wrapped = Err::<(), _>(UsageError("bad".into()))
            .context("Import aborted")
            .unwrap_err();
        assert_eq!(categorize_error(&wrapped), ExitCodes::INVALID_ARGS);
    }

    #[test]
    fn test_other_errors_map_to_run_failed() {
        let err = anyhow::anyhow!("store unavailable");
        assert_eq!(categorize_error(&err), ExitCodes::RUN_FAILED);
    }
}
