//! Error types for mcat-web
//!
//! Status mapping:
//! - NotFound -> 404
//! - Validation and store constraint violations -> 400
//! - Lock contention / pool exhaustion -> 503 with `Retry-After`
//! - Everything else from the store -> 500

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::render;

/// Seconds a client should wait before retrying after contention
const RETRY_AFTER_SECS: &str = "1";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// mcat-common error, classified on conversion to a response
    #[error(transparent)]
    Common(#[from] mcat_common::Error),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Common(err) => match err {
                mcat_common::Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                mcat_common::Error::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                e if e.is_constraint_violation() => (StatusCode::BAD_REQUEST, "CONSTRAINT_VIOLATION"),
                e if e.is_transient() => (StatusCode::SERVICE_UNAVAILABLE, "STORE_BUSY"),
                mcat_common::Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
        }
    }

    /// Client-facing message. Server-side failures get a generic message;
    /// the detail goes to the log only.
    fn public_message(&self, status: StatusCode) -> String {
        if status.is_server_error() {
            match status {
                StatusCode::SERVICE_UNAVAILABLE => {
                    "The catalog is busy, please retry shortly".to_string()
                }
                _ => "Internal server error".to_string(),
            }
        } else {
            match self {
                ApiError::NotFound(msg) | ApiError::BadRequest(msg) => msg.clone(),
                ApiError::Common(err) => err.to_string(),
            }
        }
    }

    fn log(&self, status: StatusCode) {
        if status.is_server_error() {
            error!(status = status.as_u16(), "Request failed: {}", self);
        } else {
            warn!(status = status.as_u16(), "Request rejected: {}", self);
        }
    }

    /// Log once and produce status, error code and client message
    fn classify(&self) -> (StatusCode, &'static str, String) {
        let (status, code) = self.status_and_code();
        self.log(status);
        (status, code, self.public_message(status))
    }
}

fn with_retry_hint(status: StatusCode, mut response: Response) -> Response {
    if status == StatusCode::SERVICE_UNAVAILABLE {
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, header::HeaderValue::from_static(RETRY_AFTER_SECS));
    }
    response
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = self.classify();

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        with_retry_hint(status, (status, body).into_response())
    }
}

/// Malformed or incomplete JSON bodies are client errors like any other
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Same classification as [`ApiError`], rendered as an HTML page
#[derive(Debug)]
pub struct PageError(pub ApiError);

impl From<ApiError> for PageError {
    fn from(err: ApiError) -> Self {
        PageError(err)
    }
}

impl From<mcat_common::Error> for PageError {
    fn from(err: mcat_common::Error) -> Self {
        PageError(ApiError::Common(err))
    }
}

impl From<FormRejection> for PageError {
    fn from(rejection: FormRejection) -> Self {
        PageError(ApiError::BadRequest(rejection.body_text()))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, _, message) = self.0.classify();
        with_retry_hint(status, (status, render::error_page(status, &message)).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::from(mcat_common::Error::Validation("Unknown column 'x'".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_transient_store_error_suggests_retry() {
        let err = ApiError::from(mcat_common::Error::Database(sqlx::Error::PoolTimedOut));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::RETRY_AFTER], RETRY_AFTER_SECS);
    }

    #[tokio::test]
    async fn test_json_rejection_maps_to_bad_request() {
        use axum::{body::Body, extract::FromRequest, http::Request, Json};

        #[derive(Debug, serde::Deserialize)]
        struct Payload {
            #[allow(dead_code)]
            name: String,
        }

        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"other": 1}"#))
            .unwrap();
        let rejection = Json::<Payload>::from_request(request, &()).await.unwrap_err();

        let response = ApiError::from(rejection).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_failure_is_generic_500() {
        let err = PageError::from(mcat_common::Error::Internal("secret detail".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }
}
