// Signal handling module
//
// - SIGINT  (Ctrl+C): graceful shutdown
// - SIGTERM:          graceful shutdown
//
// Non-Unix targets only see Ctrl+C.

use crate::logger;

/// Wait until the process is asked to stop; returns the signal name
#[cfg(unix)]
pub async fn wait_for_shutdown() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = sigterm.recv() => "SIGTERM",
                () = ctrl_c() => "SIGINT",
            }
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            ctrl_c().await;
            "SIGINT"
        }
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn wait_for_shutdown() -> &'static str {
    ctrl_c().await;
    "Ctrl+C"
}

/// Resolve on Ctrl+C; never resolves if the handler cannot be installed
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_warning(&format!("Failed to listen for Ctrl+C: {e}"));
        std::future::pending::<()>().await;
    }
}
