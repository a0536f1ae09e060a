//! Custom extractors for Axum handlers.
//!
//! Extractors here reject with [`AppError`](crate::errors::AppError) so that a
//! malformed request flows through the same error mapping as handler failures.

pub mod json_body;

pub use json_body::JsonBody;
