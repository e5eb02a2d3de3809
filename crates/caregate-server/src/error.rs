//! HTTP error mapping.
//!
//! Every [`CoreError`] renders to exactly one status code:
//! Validation → 400, AuthenticationFailed → 401, AuthorizationDenied
//! → 403, NotFound → 404, AlreadyExists → 409, Service → 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use caregate_core::error::CoreError;
use serde::{Deserialize, Serialize};

/// API-level error: a [`CoreError`] plus its HTTP rendering.
#[derive(Debug)]
pub struct ApiError(pub CoreError);

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match &self.0 {
            CoreError::Validation { .. } => StatusCode::BAD_REQUEST,
            CoreError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            CoreError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            CoreError::AlreadyExists { .. } => StatusCode::CONFLICT,
            CoreError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn error_code(&self) -> &'static str {
        match &self.0 {
            CoreError::Validation { .. } => "validation_error",
            CoreError::AuthenticationFailed { .. } => "unauthorized",
            CoreError::AuthorizationDenied { .. } => "forbidden",
            CoreError::NotFound { .. } => "not_found",
            CoreError::AlreadyExists { .. } => "conflict",
            CoreError::Service(_) => "service_error",
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

/// API error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code for programmatic handling.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Infrastructure details go to the log, not to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
            "internal error".to_string()
        } else {
            self.0.to_string()
        };

        let body = ErrorBody {
            error: self.error_code().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        let cases = [
            (
                CoreError::Validation {
                    message: "bad".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::AuthenticationFailed {
                    reason: "invalid credentials".into(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                CoreError::AuthorizationDenied {
                    reason: "forbidden".into(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                CoreError::NotFound {
                    entity: "account".into(),
                    id: "x".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                CoreError::AlreadyExists {
                    entity: "account".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                CoreError::Service("db down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError(err).status_code(), status);
        }
    }

    #[test]
    fn service_detail_is_not_client_visible() {
        let err = ApiError(CoreError::Service("secret connection string".into()));
        // The body is built in into_response; assert on the pieces it uses.
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "service_error");
    }
}
