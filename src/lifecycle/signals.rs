//! OS signal handling.

use crate::lifecycle::cancel::CancelHandle;

/// Cancel `handle` on the first Ctrl+C.
pub fn cancel_on_ctrl_c(handle: CancelHandle) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            return;
        }
        tracing::info!("Interrupt received, cancelling request");
        handle.cancel();
    });
}
