//! JSON body extractor that rejects with [`AppError::InvalidBody`].

use crate::errors::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// JSON request body.
///
/// Unlike `axum::Json`, the `Content-Type` header is not inspected. The body must
/// start with a JSON object (or `null`, read as an empty object) which is then
/// decoded as `T`; anything after that first value is ignored. Arrays, scalars,
/// an empty body and decode failures become [`AppError::InvalidBody`] carrying
/// the decoder's message.
///
/// # Example
/// ```ignore
/// use axum_helpers::{AppResult, JsonBody};
///
/// async fn create(JsonBody(payload): JsonBody<NewThing>) -> AppResult<String> {
///     Ok(payload.name)
/// }
/// ```
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidBody(e.body_text()))?;

        let mut values =
            serde_json::Deserializer::from_slice(&bytes).into_iter::<Option<Map<String, Value>>>();

        let object = match values.next() {
            Some(Ok(object)) => object.unwrap_or_default(),
            Some(Err(e)) => return Err(AppError::InvalidBody(e.to_string())),
            None => return Err(AppError::InvalidBody("empty request body".to_string())),
        };

        serde_json::from_value(Value::Object(object))
            .map(JsonBody)
            .map_err(|e| AppError::InvalidBody(e.to_string()))
    }
}
