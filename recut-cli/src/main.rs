//! CLI entry point for the recut refinement pipeline.
//!
//! Parses command-line arguments with clap, runs the refinement, renders
//! the summary to stdout, and maps errors to appropriate exit codes.
//! Logging is initialized eagerly so subsequent operations can emit
//! structured diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use recut_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::error;

/// Execute the parsed command, render the summary, and flush the output
/// stream.
fn try_main(cli: Cli) -> Result<()> {
    let summary = run_cli(cli).context("failed to refine clustering")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = logging::init_logging(cli.quiet) {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main(cli) {
        let (code, clusterer_code) = err
            .chain()
            .find_map(|cause| {
                // Downcast each cause so context layers do not obscure
                // `CliError` instances that carry structured codes.
                let cause: &(dyn std::error::Error + 'static) = cause;
                cause
                    .downcast_ref::<CliError>()
                    .and_then(|cli_error| match cli_error {
                        CliError::Core(core) => {
                            Some((Some(core.code()), core.clusterer_code()))
                        }
                        CliError::Clusterer(clusterer) => {
                            Some((None, Some(clusterer.code())))
                        }
                        _ => None,
                    })
            })
            .unwrap_or((None, None));

        error!(
            error = %err,
            code = ?code.map(|c| c.as_str()),
            clusterer_code = ?clusterer_code.map(|c| c.as_str()),
            "refinement failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Emit a fallback diagnostic to stderr when tracing initialization
/// fails.
#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
