//! # Process shutdown signal.
//!
//! [`wait_for_shutdown_signal`] completes when the process is asked to stop. Callers
//! typically cancel the root [`CancellationToken`](tokio_util::sync::CancellationToken)
//! handed to their workers via `with_token`; targets observing it answer with
//! [`TaskError::Canceled`](crate::TaskError::Canceled) and their workers exit silently.
//!
//! ## Signals
//! - unix: `SIGINT` (Ctrl-C), `SIGTERM`, `SIGQUIT`
//! - elsewhere: Ctrl-C via [`tokio::signal::ctrl_c`]

/// Waits for a termination signal.
///
/// Returns `Err` if signal registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv() => tracing::debug!("SIGINT received"),
        _ = sigterm.recv() => tracing::debug!("SIGTERM received"),
        _ = sigquit.recv() => tracing::debug!("SIGQUIT received"),
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Returns `Err` if signal registration fails.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
