//! MongoDB implementation of [`Storage`]

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Document, doc, oid::ObjectId},
};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::instrument;

use crate::error::{StorageError, StorageResult};
use crate::models::Entity;
use crate::repository::Storage;

/// Parse the canonical 24-hex-character form into an [`ObjectId`].
pub(crate) fn parse_id(id: &str) -> StorageResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StorageError::InvalidIdentifier(id.to_string()))
}

/// Stored shape of an account: `{"_id", "email", "username", "password"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl AccountDocument {
    /// Document for insertion; the store assigns `_id`.
    pub fn for_insert<E: Entity>(entity: &E) -> Self {
        Self {
            id: None,
            email: entity.email().to_string(),
            username: entity.username().to_string(),
            password: entity.password_hash().to_string(),
        }
    }

    pub fn into_entity<E: Entity>(self) -> E {
        E::from_fields(
            self.id.map(|id| id.to_hex()).unwrap_or_default(),
            self.email,
            self.username,
            self.password,
        )
    }
}

/// `$set` of every mutable field, empty values included.
pub fn full_update_document<E: Entity>(entity: &E) -> Document {
    doc! {
        "$set": {
            "email": entity.email(),
            "username": entity.username(),
            "password": entity.password_hash(),
        }
    }
}

/// `$set` of the non-empty fields only, or `None` when there is nothing to write.
pub fn partial_update_document<E: Entity>(entity: &E) -> Option<Document> {
    let mut set = Document::new();
    for (field, value) in [
        ("email", entity.email()),
        ("username", entity.username()),
        ("password", entity.password_hash()),
    ] {
        if !value.is_empty() {
            set.insert(field, value);
        }
    }

    if set.is_empty() {
        None
    } else {
        Some(doc! { "$set": set })
    }
}

/// MongoDB-backed storage for one entity kind
pub struct MongoStorage<E> {
    collection: Collection<AccountDocument>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> MongoStorage<E> {
    /// Storage over the kind's default collection (`users`, `admins`)
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, E::COLLECTION)
    }

    /// Storage over a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<AccountDocument>(collection_name),
            _entity: PhantomData,
        }
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<AccountDocument> {
        &self.collection
    }
}

#[async_trait]
impl<E: Entity> Storage<E> for MongoStorage<E> {
    #[instrument(skip_all, fields(kind = E::KIND))]
    async fn create(&self, entity: E) -> StorageResult<String> {
        let result = self
            .collection
            .insert_one(AccountDocument::for_insert(&entity))
            .await?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            StorageError::Store(format!(
                "inserted id is not an ObjectId: {}",
                result.inserted_id
            ))
        })?;

        Ok(id.to_hex())
    }

    #[instrument(skip(self), fields(kind = E::KIND))]
    async fn find_one(&self, id: &str) -> StorageResult<E> {
        let oid = parse_id(id)?;
        self.collection
            .find_one(doc! { "_id": oid })
            .await?
            .map(AccountDocument::into_entity)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    #[instrument(skip_all, fields(kind = E::KIND, id = entity.id()))]
    async fn update(&self, entity: E) -> StorageResult<()> {
        let oid = parse_id(entity.id())?;
        self.collection
            .update_one(doc! { "_id": oid }, full_update_document(&entity))
            .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(kind = E::KIND, id = entity.id()))]
    async fn partially_update(&self, entity: E) -> StorageResult<()> {
        let oid = parse_id(entity.id())?;
        let Some(update) = partial_update_document(&entity) else {
            tracing::debug!("Nothing to update");
            return Ok(());
        };
        self.collection
            .update_one(doc! { "_id": oid }, update)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(kind = E::KIND))]
    async fn delete(&self, id: &str) -> StorageResult<()> {
        let oid = parse_id(id)?;
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        tracing::debug!(deleted = result.deleted_count, "Delete finished");
        Ok(())
    }

    #[instrument(skip(self), fields(kind = E::KIND))]
    async fn get_all(&self) -> StorageResult<Vec<E>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<AccountDocument> = cursor.try_collect().await?;
        Ok(documents
            .into_iter()
            .map(AccountDocument::into_entity)
            .collect())
    }
}
