//! In-process [`Storage`] with the same identifier rules as MongoDB.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::error::{StorageError, StorageResult};
use crate::models::Entity;
use crate::mongodb::parse_id;
use crate::repository::Storage;

/// Insertion-ordered entities behind an async lock.
#[derive(Debug, Default)]
pub struct InMemoryStorage<E> {
    entities: RwLock<Vec<E>>,
}

impl<E: Entity> InMemoryStorage<E> {
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored entities
    pub async fn len(&self) -> usize {
        self.entities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.read().await.is_empty()
    }
}

/// Stored ids are lowercase hex; MongoDB matches any spelling of the same ObjectId.
fn canonical_id(id: &str) -> StorageResult<String> {
    parse_id(id).map(|oid| oid.to_hex())
}

#[async_trait]
impl<E: Entity> Storage<E> for InMemoryStorage<E> {
    async fn create(&self, mut entity: E) -> StorageResult<String> {
        let id = ObjectId::new().to_hex();
        entity.set_id(id.clone());
        self.entities.write().await.push(entity);
        Ok(id)
    }

    async fn find_one(&self, id: &str) -> StorageResult<E> {
        let key = canonical_id(id)?;
        self.entities
            .read()
            .await
            .iter()
            .find(|e| e.id() == key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn update(&self, mut entity: E) -> StorageResult<()> {
        let key = canonical_id(entity.id())?;
        let mut entities = self.entities.write().await;
        if let Some(stored) = entities.iter_mut().find(|e| e.id() == key) {
            entity.set_id(key);
            *stored = entity;
        }
        Ok(())
    }

    async fn partially_update(&self, entity: E) -> StorageResult<()> {
        let key = canonical_id(entity.id())?;
        let mut entities = self.entities.write().await;
        if let Some(stored) = entities.iter_mut().find(|e| e.id() == key) {
            stored.apply_patch(&entity);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let key = canonical_id(id)?;
        self.entities.write().await.retain(|e| e.id() != key);
        Ok(())
    }

    async fn get_all(&self) -> StorageResult<Vec<E>> {
        Ok(self.entities.read().await.clone())
    }
}
