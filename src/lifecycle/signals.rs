//! OS signal handling.

/// Resolves on Ctrl+C.
///
/// If the handler cannot be installed the error is logged and the future
/// never resolves, leaving the proxy running until it is killed.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
