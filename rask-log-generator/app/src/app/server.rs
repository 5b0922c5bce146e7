use crate::error::GeneratorError;
use axum::Router;
use std::net::SocketAddr;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

/// Serve `app` on all interfaces until SIGINT/SIGTERM or `shutdown_token` fires.
///
/// Once the listener has stopped, `generation_tasks` is closed and awaited so
/// cancelled runs get to send their error record.
pub async fn serve(
    app: Router,
    http_port: u16,
    shutdown_token: CancellationToken,
    generation_tasks: TaskTracker,
) -> Result<(), GeneratorError> {
    let bind_addr = format!("0.0.0.0:{http_port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| GeneratorError::Bind {
            address: bind_addr.clone(),
            source: e,
        })?;
    info!("Server listening on {}", listener.local_addr()?);
    info!("  - GET  /               (demo page)");
    info!("  - GET  /generate       (background log generation)");
    info!("  - GET  /api/logs       (synthetic API log entries)");
    info!("  - GET  /api/system     (host metrics)");
    info!("  - GET  /error          (deliberate error)");
    info!("  - GET  /v1/health      (health check)");

    let server_shutdown = shutdown_token.clone();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        tokio::select! {
            () = shutdown_signal() => server_shutdown.cancel(),
            () = server_shutdown.cancelled() => {}
        }
    })
    .await?;

    generation_tasks.close();
    if !generation_tasks.is_empty() {
        info!(
            "Waiting for {} generation task(s) to finish",
            generation_tasks.len()
        );
    }
    generation_tasks.wait().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C) for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
