//! Axum middleware for automatic HTTP request metrics.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, Response},
    middleware::Next,
};
use metrics::{counter, histogram};
use std::time::Instant;

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

/// Middleware function for recording HTTP request metrics.
///
/// Records, after the inner handler has produced its response (including error
/// responses):
/// - `http_requests_total` - Counter with method, path, status labels
/// - `http_request_duration_seconds` - Histogram with method, path labels
///
/// `path` is the matched route template, so `/users/{id}` is one series no matter
/// which identifier was requested. Attach it with `route_layer` so only matched
/// routes are recorded.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use observability::middleware::metrics_middleware;
///
/// let app = Router::new()
///     .route("/", get(handler))
///     .route_layer(middleware::from_fn(metrics_middleware));
/// ```
pub async fn metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status().as_u16().to_string();

    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method,
        "path" => path
    )
    .record(duration.as_secs_f64());

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, middleware, routing::get};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    /// Sum of every `http_requests_total` sample whose labels contain all `labels`.
    fn requests_total(rendered: &str, labels: &[&str]) -> u64 {
        rendered
            .lines()
            .filter(|line| line.starts_with("http_requests_total{"))
            .filter(|line| labels.iter().all(|label| line.contains(label)))
            .filter_map(|line| line.rsplit(' ').next())
            .filter_map(|value| value.parse::<u64>().ok())
            .sum()
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/things/{id}",
                get(|axum::extract::Path(id): axum::extract::Path<String>| async move {
                    if id == "missing" {
                        (StatusCode::NOT_FOUND, "resource not found")
                    } else {
                        (StatusCode::OK, "found")
                    }
                }),
            )
            .route_layer(middleware::from_fn(metrics_middleware))
    }

    // Single-threaded runtime keeps every poll on the thread owning the local recorder.
    #[tokio::test(flavor = "current_thread")]
    async fn test_counter_sum_matches_request_count_across_statuses() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let uris = ["/things/a", "/things/b", "/things/missing", "/things/c", "/things/missing"];
        for uri in uris {
            let request = Request::get(uri).body(Body::empty()).unwrap();
            app().oneshot(request).await.unwrap();
        }

        let rendered = handle.render();
        let route = r#"path="/things/{id}""#;
        let get = r#"method="GET""#;

        assert_eq!(requests_total(&rendered, &[get, route]), uris.len() as u64);
        assert_eq!(requests_total(&rendered, &[get, route, r#"status="404""#]), 2);
        assert_eq!(requests_total(&rendered, &[get, route, r#"status="200""#]), 3);
        assert!(rendered.contains("http_request_duration_seconds"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_unmatched_routes_are_not_recorded() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let request = Request::get("/elsewhere").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        assert_eq!(requests_total(&handle.render(), &[]), 0);
    }
}
