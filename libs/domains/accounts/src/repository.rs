use async_trait::async_trait;

use crate::error::StorageResult;
use crate::models::Entity;

/// Persistence contract for one entity kind.
///
/// Identifiers are the canonical string form of the store's native identifier;
/// only implementations know how to convert between the two. Every method is a
/// single round trip to the backing store (`get_all` also drains its cursor).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage<E: Entity>: Send + Sync {
    /// Insert `entity` (its `id` is ignored) and return the assigned identifier.
    async fn create(&self, entity: E) -> StorageResult<String>;

    /// Fetch one entity. `NotFound` when nothing matches, `InvalidIdentifier`
    /// when `id` cannot be parsed.
    async fn find_one(&self, id: &str) -> StorageResult<E>;

    /// Overwrite every mutable field of the entity identified by `entity.id()`.
    /// A missing entity is not an error.
    async fn update(&self, entity: E) -> StorageResult<()>;

    /// Overwrite only the fields that are non-empty in `entity`.
    async fn partially_update(&self, entity: E) -> StorageResult<()>;

    /// Remove the entity. A missing entity is not an error.
    async fn delete(&self, id: &str) -> StorageResult<()>;

    /// Every entity in store order.
    async fn get_all(&self) -> StorageResult<Vec<E>>;
}
