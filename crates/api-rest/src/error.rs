//! API error type and its mapping onto HTTP responses.
//!
//! Every error body has the shape `{ "error": <message> }`.

use api_shared::ErrorRes;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use surgery_core::SurgeryError;

/// Message returned for unknown ids.
pub const NOT_FOUND_MESSAGE: &str = "Surgery not found";

/// Message returned when the store fails. Details go to the log, not the client.
pub const INTERNAL_MESSAGE: &str = "Internal error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Surgery not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            ApiError::Validation(message) => message,
            ApiError::NotFound => NOT_FOUND_MESSAGE.to_string(),
            ApiError::StoreUnavailable(detail) => {
                tracing::error!(%detail, "surgery store error");
                INTERNAL_MESSAGE.to_string()
            }
        };
        (status, Json(ErrorRes { error })).into_response()
    }
}

impl From<SurgeryError> for ApiError {
    fn from(err: SurgeryError) -> Self {
        match err {
            SurgeryError::Validation(_) => ApiError::Validation(err.to_string()),
            SurgeryError::NotFound(_) => ApiError::NotFound,
            other => ApiError::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
