//! transform-benchmark CLI entry point.
//!
//! Initializes logging, runs the CLI, and maps the outcome to an exit code.

use std::process::ExitCode;

use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = benchmark_transformer::cli::parse_cli();
    let verbose = cli.verbose;

    // Priority: RUST_LOG env var > --log-level / --verbose > default "info"
    let log_filter = cli.log_filter();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)))
        .init();

    tokio::select! {
        result = benchmark_transformer::cli::run_with_cli(cli) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{:#}", e);
                if verbose {
                    eprintln!("{:?}", e);
                }
                ExitCode::FAILURE
            }
        },
        _ = benchmark_transformer::cli::wait_for_interrupt(tokio::signal::ctrl_c()) => {
            warn!("Interrupted by user");
            // The blocking copy thread may still be running.
            std::process::exit(1);
        }
    }
}
