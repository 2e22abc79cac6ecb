//! Listener lifecycle
//!
//! Binds the HTTP listener, serves lookups until a shutdown signal arrives,
//! then drains in-flight requests.

use crate::index::Index;
use crate::server::http::router;
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

/// Serve `index` on `addr` until SIGINT or SIGTERM
pub async fn serve(index: Index, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    serve_with_shutdown(listener, Arc::new(index), shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` completes
pub async fn serve_with_shutdown<F>(listener: TcpListener, index: Arc<Index>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, records = index.len(), "listening");

    axum::serve(listener, router(index))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    info!("server stopped");
    Ok(())
}

/// Resolve when the process receives Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!(signal = "interrupt", "shutting down"),
        _ = terminate => info!(signal = "terminate", "shutting down"),
    }
}
