//! JSON body extractor with enveloped rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// JSON body extractor.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::EnvelopeJson;
///
/// async fn create_user(EnvelopeJson(payload): EnvelopeJson<CreateUser>) -> Response {
///     // ...
/// }
/// ```
pub struct EnvelopeJson<T>(pub T);

impl<T, S> FromRequest<S> for EnvelopeJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(EnvelopeJson(data))
    }
}
