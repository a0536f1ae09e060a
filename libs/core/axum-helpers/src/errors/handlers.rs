use axum::response::{IntoResponse, Response};

use super::AppError;

/// Fallback handler for unmatched routes.
pub async fn not_found() -> Response {
    AppError::NotFound("no route matched".to_string()).into_response()
}
