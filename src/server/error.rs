use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Everything a handler can fail with.
///
/// Clients only ever see the status and a fixed message: bad input and store
/// failures both surface as 422 and cannot be told apart from outside.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Absent resource, or a page/collection that came out empty
    #[error("resource not found")]
    NotFound,

    /// Malformed body or a lookup on an unknown id
    #[error("invalid request: {0}")]
    Validation(String),

    /// Any failure reported by the database, constraint violations included
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::Store(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::NotFound => "resource not found",
            ApiError::Validation(_) | ApiError::Store(_) => "unprocessable",
            ApiError::MethodNotAllowed => "method not allowed",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: u16,
    pub message: &'static str,
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(err: &ApiError) -> Self {
        Self {
            success: false,
            error: err.status_code().as_u16(),
            message: err.message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(error) => tracing::error!(%error, "store failure"),
            ApiError::Validation(reason) => tracing::warn!(%reason, "unprocessable request"),
            ApiError::NotFound | ApiError::MethodNotAllowed => tracing::debug!("{self}"),
        }
        let body = Json(ErrorEnvelope::from(&self));
        (self.status_code(), body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

// a path segment that does not parse never matched the route in the first place
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::NotFound
    }
}
