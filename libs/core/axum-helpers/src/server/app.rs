use super::shutdown::{ShutdownCoordinator, shutdown_signal};
use crate::errors::handlers::not_found;
use crate::http::security::security_headers;
use axum::{Router, http::StatusCode, middleware};
use core_config::server::{ListenType, ServerConfig};
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

/// Binds the configured listener and serves `router` until `shutdown` resolves.
async fn serve<F>(router: Router, server_config: &ServerConfig, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    match server_config.listen_type {
        ListenType::Tcp => {
            let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
            info!("Server listening on {}", listener.local_addr()?);
            axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(shutdown)
                .await
        }
        #[cfg(unix)]
        ListenType::Unix => {
            let path = &server_config.socket_path;
            // A socket left behind by a previous run makes bind fail with AddrInUse.
            match std::fs::remove_file(path) {
                Ok(()) => info!("Removed stale socket {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
            let listener = tokio::net::UnixListener::bind(path)?;
            info!("Server listening on unix:{}", path.display());
            axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(shutdown)
                .await
        }
        #[cfg(not(unix))]
        ListenType::Unix => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "unix socket listeners are not supported on this platform",
        )),
    }
}

/// Starts the Axum server with graceful shutdown on SIGINT/SIGTERM.
///
/// # Errors
/// Returns an error if the listener fails to bind or the server fails while running.
pub async fn create_app(router: Router, server_config: &ServerConfig) -> io::Result<()> {
    serve(router, server_config, shutdown_signal())
        .await
        .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e))
}

/// Wraps `apis` with the cross-cutting layers shared by every application.
///
/// - 404 fallback rendered through [`AppError`](crate::AppError)
/// - `TraceLayer` request/response spans at INFO
/// - per-request `TimeoutLayer` (408 when exceeded)
/// - security headers
///
/// Domain routers are expected to have their state applied already.
pub fn create_router(apis: Router, request_timeout: Duration) -> Router {
    Router::new()
        .merge(apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::from_fn(security_headers))
}

/// Production-ready server with coordinated shutdown and cleanup.
///
/// On SIGINT/SIGTERM the server stops accepting connections, drains in-flight
/// requests and runs `cleanup`, bounded by `shutdown_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::default();

    let signal_handle = coordinator.clone();
    tokio::spawn(async move { signal_handle.wait_for_signal().await });

    let cleanup_handle = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            coordinator.wait_for_shutdown().await;

            info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
            match tokio::time::timeout(shutdown_timeout, cleanup).await {
                Ok(_) => info!("Cleanup completed successfully"),
                Err(_) => tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                ),
            }
        })
    };

    let serve_shutdown = {
        let coordinator = coordinator.clone();
        async move { coordinator.wait_for_shutdown().await }
    };

    let serve_result = serve(router, server_config, serve_shutdown)
        .await
        .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    // A bind or serve failure also has to release the cleanup task.
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}
