use axum::{http::StatusCode, Json};
use serde::Serialize;
use tracing::{error, warn};

use crate::store::StoreError;

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

pub type ApiError = (StatusCode, Json<Message>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(Message {
            message: message.into(),
        }),
    )
}

/// Maps a store failure to a response. `context` is the message returned on
/// a 500, e.g. "Error creating group".
pub fn store_failure(e: StoreError, context: &str) -> ApiError {
    match e {
        StoreError::AlreadyExists { pk, sk } => {
            warn!(%pk, %sk, "{context}: already exists");
            api_error(StatusCode::CONFLICT, "Already exists")
        }
        other => {
            error!(error = %other, "{context}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, context)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_and_internal_mapping() {
        let (status, _) = store_failure(
            StoreError::AlreadyExists {
                pk: "GROUP#x".into(),
                sk: "DETAILS".into(),
            },
            "Error creating group",
        );
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, Json(body)) =
            store_failure(StoreError::Unavailable("boom".into()), "Error listing bills");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Error listing bills");
    }
}
