//! Error types for the HTTP layer.
//!
//! Display strings are what the client sees in the envelope's `error` field,
//! so they stay short and fixed. Details belong in the log.

use crate::response::Envelope;
use crate::validation::ValidationError;
use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use passvault_sso::UpstreamError;
use passvault_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential presented.
    #[error("unauthorized")]
    Unauthorized,

    /// Credential could not be decoded or verified.
    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    /// Body exceeded the buffering limit.
    #[error("request too large")]
    PayloadTooLarge,

    /// Deadline already gone before any downstream call was made.
    #[error("request timed out")]
    RequestTimeout,

    /// A downstream call (storage or identity service) ran out of time.
    #[error("request timed out")]
    GatewayTimeout,

    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidToken | ApiError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a storage failure, with the client messages for this operation.
    pub fn from_storage(err: &StorageError, not_found: &'static str, failed: &'static str) -> Self {
        match err {
            StorageError::NotFound => ApiError::NotFound(not_found),
            StorageError::Timeout => ApiError::GatewayTimeout,
            StorageError::Unavailable(_) => ApiError::Internal(failed),
        }
    }

    pub fn from_upstream(err: &UpstreamError, failed: &'static str) -> Self {
        match err {
            UpstreamError::Timeout => ApiError::GatewayTimeout,
            UpstreamError::Unavailable(_) => ApiError::Internal(failed),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Body read failures. The rejection text stays in the log.
impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        tracing::warn!(error = %rejection, "failed to read request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(ValidationError::Decode(rejection.body_text()).to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(Envelope::error(self.to_string()))).into_response()
    }
}
