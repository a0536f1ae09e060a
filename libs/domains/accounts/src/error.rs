use axum_helpers::AppError;
use thiserror::Error;

/// Failures reported by a [`Storage`](crate::Storage) implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No document matched the identifier.
    #[error("no document with id {0}")]
    NotFound(String),

    /// The identifier is not in the store's native format.
    #[error("invalid identifier {0}")]
    InvalidIdentifier(String),

    #[error("store error: {0}")]
    Store(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<mongodb::error::Error> for StorageError {
    fn from(err: mongodb::error::Error) -> Self {
        StorageError::Store(err.to_string())
    }
}

/// Default mapping used by create, list and delete.
///
/// Get, update and partial update narrow this in their handlers.
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => AppError::NotFound(id),
            StorageError::InvalidIdentifier(id) => AppError::InvalidIdentifierFormat(id),
            StorageError::Store(msg) => AppError::Internal(msg),
        }
    }
}
