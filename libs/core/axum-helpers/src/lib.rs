//! # Axum Helpers
//!
//! Utilities, middleware, and helpers shared by the HTTP applications in this workspace.
//!
//! ## Modules
//!
//! - **[`errors`]**: Closed error taxonomy and its mapping to HTTP status codes
//! - **[`extractors`]**: Custom extractors (JSON body with [`AppError`] rejection)
//! - **[`server`]**: Server setup, health checks, graceful shutdown
//! - **[`http`]**: HTTP middleware (security headers)
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ServerConfig::default();
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router(api_routes, config.request_timeout);
//!     create_app(router, &config).await
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

// Re-export HTTP middleware
pub use http::security_headers;

// Re-export error types
pub use errors::{AppError, AppResult};

// Re-export extractors
pub use extractors::JsonBody;
