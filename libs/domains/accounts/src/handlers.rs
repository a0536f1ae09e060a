use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{AppError, AppResult, JsonBody};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use crate::error::StorageError;
use crate::models::Entity;
use crate::repository::Storage;

/// Body returned by a successful create
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Create the CRUD router for one entity kind.
///
/// | Method | Path | Success |
/// |---|---|---|
/// | GET | `/` | 200, JSON array |
/// | POST | `/` | 201, `{"id": ...}` |
/// | GET | `/{id}` | 200, JSON entity |
/// | PUT | `/{id}` | 204 |
/// | PATCH | `/{id}` | 204 |
/// | DELETE | `/{id}` | 204 |
pub fn router<E, S>(storage: S) -> Router
where
    E: Entity,
    S: Storage<E> + 'static,
{
    let shared_storage = Arc::new(storage);

    Router::new()
        .route("/", get(list::<E, S>).post(create::<E, S>))
        .route(
            "/{id}",
            get(get_one::<E, S>)
                .put(update::<E, S>)
                .patch(partially_update::<E, S>)
                .delete(delete::<E, S>),
        )
        .with_state(shared_storage)
}

#[instrument(skip_all, fields(kind = E::KIND))]
async fn list<E: Entity, S: Storage<E>>(State(storage): State<Arc<S>>) -> AppResult<Response> {
    let entities = storage.get_all().await?;
    tracing::debug!(count = entities.len(), "Listed entities");
    Ok(Json(entities).into_response())
}

#[instrument(skip_all, fields(kind = E::KIND))]
async fn create<E: Entity, S: Storage<E>>(
    State(storage): State<Arc<S>>,
    JsonBody(mut entity): JsonBody<E>,
) -> AppResult<Response> {
    if !entity.has_required_fields() {
        return Err(AppError::MissingRequiredFields);
    }

    entity.set_id(String::new());
    let id = storage.create(entity).await?;

    tracing::info!(id = %id, "Entity created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })).into_response())
}

#[instrument(skip(storage), fields(kind = E::KIND))]
async fn get_one<E: Entity, S: Storage<E>>(
    State(storage): State<Arc<S>>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let entity = storage.find_one(&id).await.map_err(|err| match err {
        StorageError::NotFound(id) | StorageError::InvalidIdentifier(id) => AppError::NotFound(id),
        StorageError::Store(msg) => AppError::Internal(msg),
    })?;

    Ok(Json(entity).into_response())
}

/// Writes never report a missing entity, and an unparseable id is a store failure.
fn write_error(err: StorageError) -> AppError {
    AppError::Internal(err.to_string())
}

#[instrument(skip(storage, entity), fields(kind = E::KIND))]
async fn update<E: Entity, S: Storage<E>>(
    State(storage): State<Arc<S>>,
    Path(id): Path<String>,
    JsonBody(mut entity): JsonBody<E>,
) -> AppResult<Response> {
    entity.set_id(id);
    storage.update(entity).await.map_err(write_error)?;

    tracing::info!("Entity updated");
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[instrument(skip(storage, entity), fields(kind = E::KIND))]
async fn partially_update<E: Entity, S: Storage<E>>(
    State(storage): State<Arc<S>>,
    Path(id): Path<String>,
    JsonBody(mut entity): JsonBody<E>,
) -> AppResult<Response> {
    entity.set_id(id);
    storage.partially_update(entity).await.map_err(write_error)?;

    tracing::info!("Entity partially updated");
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[instrument(skip(storage), fields(kind = E::KIND))]
async fn delete<E: Entity, S: Storage<E>>(
    State(storage): State<Arc<S>>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    storage.delete(&id).await?;

    tracing::info!("Entity deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
