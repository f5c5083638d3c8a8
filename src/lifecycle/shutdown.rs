//! Shutdown signal for the HTTP front.

/// Resolve once Ctrl+C is received.
///
/// If the handler cannot be installed the future never resolves and the
/// process is left to the host's own termination.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
