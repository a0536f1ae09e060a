//! Observability utilities for the REST API.
//!
//! This crate provides:
//! - Prometheus recorder installation and the `/metrics` exposition handler
//! - Axum middleware recording per-route request counts and latency
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, metrics_middleware};
//!
//! init_metrics()?;
//!
//! let users = Router::new()
//!     .route("/{id}", get(get_user))
//!     .route_layer(middleware::from_fn(metrics_middleware));
//!
//! let app = Router::new()
//!     .nest("/users", users)
//!     .route("/metrics", get(metrics_handler));
//! ```

pub mod middleware;

pub use middleware::metrics_middleware;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the process-wide Prometheus recorder.
///
/// Idempotent: the first successful call installs the recorder, later calls
/// return the same handle.
///
/// # Errors
/// Fails if another global recorder was installed outside this function.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();
        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{Unit, describe_counter, describe_histogram};

    describe_counter!(
        middleware::HTTP_REQUESTS_TOTAL,
        Unit::Count,
        "Total number of HTTP requests by method, route and status"
    );
    describe_histogram!(
        middleware::HTTP_REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "HTTP request duration in seconds by method and route"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_metrics_is_idempotent() {
        let first = init_metrics().unwrap() as *const PrometheusHandle;
        let second = init_metrics().unwrap() as *const PrometheusHandle;
        assert_eq!(first, second);
        assert!(get_metrics_handle().is_some());
    }
}
