use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{api_error, ApiError};

/// JSON body that never rejects on content: a missing, empty or unparsable
/// body yields `T::default()`, so handlers report missing fields themselves.
pub struct LenientJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for LenientJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;
        if bytes.is_empty() {
            return Ok(LenientJson(T::default()));
        }
        let value = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            debug!(error = %e, "unparsable body, using defaults");
            T::default()
        });
        Ok(LenientJson(value))
    }
}
