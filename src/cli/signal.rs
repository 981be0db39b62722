//! Interrupt handling for the CLI.

use std::future::Future;
use std::io;

use tracing::warn;

/// Resolves once `signal` reports an interrupt.
///
/// If the handler cannot be installed the future never resolves, so the run
/// continues instead of being treated as interrupted.
pub async fn wait_for_interrupt<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!("Could not listen for Ctrl-C, interrupts are disabled: {}", e);
        std::future::pending::<()>().await;
    }
}
