//! Service and HTTP error types.
//!
//! `ServiceError` is what the service layer signals; `ApiError` adds
//! request validation and owns the one mapping from error kind to status.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::schemas::FieldError;

/// Domain-level failures of a phonebook operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("phone not found")]
    NotFound,

    #[error("phone already exists")]
    Conflict,

    /// The store could not be reached.
    #[error("redis is unavailable")]
    Unavailable,

    /// The store answered with something unexpected.
    #[error("store failure: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Service(ServiceError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::Conflict) => StatusCode::CONFLICT,
            ApiError::Service(ServiceError::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Service(ServiceError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => json!({ "detail": errors }),
            ApiError::Service(ServiceError::NotFound) => json!({ "detail": "Phone not found" }),
            ApiError::Service(ServiceError::Conflict) => json!({ "detail": "Phone already exists" }),
            ApiError::Service(ServiceError::Unavailable) => {
                json!({ "detail": "Redis is unavailable" })
            }
            ApiError::Service(ServiceError::Internal(_)) => {
                json!({ "detail": "Internal server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_table() {
        let cases = [
            (ApiError::Validation(vec![]), StatusCode::UNPROCESSABLE_ENTITY),
            (ServiceError::NotFound.into(), StatusCode::NOT_FOUND),
            (ServiceError::Conflict.into(), StatusCode::CONFLICT),
            (ServiceError::Unavailable.into(), StatusCode::SERVICE_UNAVAILABLE),
            (
                ServiceError::Internal("WRONGTYPE".to_string()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status(), expected, "{err:?}");
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
