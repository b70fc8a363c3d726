use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SignatureServiceError {
    #[error("invalid json")]
    MalformedRequest,
    #[error("id is not a valid uuid")]
    InvalidId,
    #[error("duplicate id")]
    DuplicateId,
    #[error("algorithm is not supported")]
    UnsupportedAlgorithm,
    #[error("signature device not found")]
    DeviceNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Error body shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

impl IntoResponse for SignatureServiceError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MalformedRequest
            | Self::InvalidId
            | Self::DuplicateId
            | Self::UnsupportedAlgorithm => StatusCode::BAD_REQUEST,
            Self::DeviceNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match self {
            Self::Internal(report) => {
                // In a real deployment this would also feed an error
                // notification service.
                tracing::error!(error = ?report, "internal error while handling request");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { errors: vec![message] })).into_response()
    }
}
