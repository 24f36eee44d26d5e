use crate::utils::error::MarketError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An HTTP error with the `{"error": "..."}` body every endpoint uses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Maps a failed submission. Anything the caller did not cause is a 500
    /// with a fixed message; the details only go to the log.
    pub fn from_submit_error(err: MarketError) -> Self {
        match err {
            MarketError::MissingFields => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            MarketError::UnknownJob { .. } => Self::new(StatusCode::NOT_FOUND, "Task not found"),
            other => {
                tracing::error!(
                    "❌ Submit error: {} (Category: {:?}, Severity: {:?})",
                    other,
                    other.category(),
                    other.severity()
                );
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process submission",
                )
            }
        }
    }

    pub fn from_pool_error(err: MarketError) -> Self {
        tracing::error!("❌ Pool info error: {}", err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to get pool info")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
