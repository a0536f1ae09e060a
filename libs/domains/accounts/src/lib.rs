//! Accounts Domain
//!
//! CRUD over the `user` and `admin` entity kinds. Both kinds share one entity
//! contract, one storage trait and one set of handlers; only the collection they
//! live in differs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, body decoding, error mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Storage   │  ← Data access (trait + MongoDB / in-memory implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity trait, User, Admin
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::Router;
//! use domain_accounts::{Admin, MongoStorage, User, handlers};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("rest_api");
//!
//! let app: Router = Router::new()
//!     .nest("/users", handlers::router::<User, _>(MongoStorage::<User>::new(&db)))
//!     .nest("/admins", handlers::router::<Admin, _>(MongoStorage::<Admin>::new(&db)));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStorage;
pub use models::{Admin, Entity, User};
pub use crate::mongodb::MongoStorage;
pub use repository::Storage;
