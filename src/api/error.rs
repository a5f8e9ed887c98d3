//! Mapping of sizing failures onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::types::ErrorResponse;
use crate::error::SizingError;

/// Message returned for every server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred.";

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            // Unknown ids are reported as bad input, not as a missing route.
            ApiError::BadRequest(_) | ApiError::NotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SizingError> for ApiError {
    fn from(err: SizingError) -> Self {
        match err {
            SizingError::Validation(msg) => ApiError::BadRequest(msg),
            SizingError::NotFound(msg) => ApiError::NotFound(msg),
            SizingError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match &self {
            ApiError::Internal(_) => {
                tracing::error!(error = %self, "internal error in /api/calculate");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            _ => {
                tracing::debug!(error = %self, "client error");
                self.to_string()
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn sizing_errors_map_by_class() {
        let err: ApiError = SizingError::Validation("need archetype".into()).into();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "need archetype"));
        let err: ApiError = SizingError::Internal("boom".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let resp = ApiError::Internal("secret stack detail".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("secret"));
        assert!(text.contains(INTERNAL_ERROR_MESSAGE));
    }
}
