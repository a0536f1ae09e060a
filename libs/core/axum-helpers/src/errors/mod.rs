//! Application error taxonomy and its HTTP mapping.
//!
//! Handlers return [`AppResult`]; the [`IntoResponse`] impl on [`AppError`] is the
//! only place a failure becomes a status code and body. Bodies are plain text and
//! equal to the variant's `Display` message. The context carried by a variant is
//! logged but never sent to the client.
//!
//! | Variant | Status |
//! |---|---|
//! | `MissingRequiredFields` | 404 |
//! | `InvalidIdentifierFormat` | 404 |
//! | `NotFound` | 404 |
//! | `Unauthorized` | 401 |
//! | anything else | 500, body `internal server error` |

pub mod handlers;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Public message used for every 500 response.
pub const INTERNAL_SERVER_ERROR: &str = "internal server error";

/// Closed set of failures a handler may report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Request body could not be decoded. Carries the decoder's message.
    #[error("invalid request body")]
    InvalidBody(String),

    #[error("missing required fields")]
    MissingRequiredFields,

    /// Identifier cannot be parsed by the store's identifier scheme.
    #[error("invalid identifier format")]
    InvalidIdentifierFormat(String),

    #[error("resource not found")]
    NotFound(String),

    /// Reserved for authenticated routes.
    #[error("unauthorized access")]
    Unauthorized(String),

    /// Catch-all for store and encoding failures. Carries the underlying error text.
    #[error("internal server error")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Wrap any displayable error as an internal failure.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        AppError::Internal(err.to_string())
    }

    /// HTTP status this failure maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingRequiredFields
            | AppError::InvalidIdentifierFormat(_)
            | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidBody(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text written to the response body.
    pub fn public_message(&self) -> String {
        let status = self.status();
        if status.is_server_error() {
            INTERNAL_SERVER_ERROR.to_string()
        } else {
            self.to_string()
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            AppError::MissingRequiredFields => None,
            AppError::InvalidBody(ctx)
            | AppError::InvalidIdentifierFormat(ctx)
            | AppError::NotFound(ctx)
            | AppError::Unauthorized(ctx)
            | AppError::Internal(ctx) => Some(ctx.as_str()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let context = self.context().unwrap_or_default();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), context, "{}", self);
        } else {
            tracing::info!(status = status.as_u16(), context, "{}", self);
        }

        (status, self.public_message()).into_response()
    }
}
