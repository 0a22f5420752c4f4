//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; every error body is a JSON-API `errors` document,
//! except not-found which answers with an empty 404.

use std::any::Any;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use products_core::{FieldError, ProductId};

use crate::db::RepositoryError;
use crate::json_api::{ErrorDocument, ErrorObject};
use crate::services::ProductServiceError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// One or more request attributes failed validation.
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The request body or path could not be parsed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Product does not exist.
    #[error("Product with id {0} not found")]
    NotFound(ProductId),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ProductServiceError> for AppError {
    fn from(err: ProductServiceError) -> Self {
        match err {
            ProductServiceError::NotFound(id) => Self::NotFound(id),
            ProductServiceError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let message = self.to_string();

        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND.into_response(),
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorDocument::from(
                    errors.iter().map(ErrorObject::validation).collect::<Vec<_>>(),
                )),
            )
                .into_response(),
            Self::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorDocument::from(vec![ErrorObject::invalid_request(
                    detail,
                )])),
            )
                .into_response(),
            Self::Database(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorDocument::from(vec![ErrorObject::internal(message)])),
            )
                .into_response(),
        }
    }
}

/// Render a handler panic as an internal error.
///
/// Used with `tower_http::catch_panic::CatchPanicLayer`. The panic payload
/// becomes the error detail when it is a string.
#[allow(clippy::needless_pass_by_value)]
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("handler panicked");

    AppError::Internal(detail.to_owned()).into_response()
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use products_core::ProductInput;

    use super::*;

    async fn body_of(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound(ProductId::new(123));
        assert_eq!(err.to_string(), "Product with id 123 not found");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound(ProductId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Validation(Vec::new())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::LockPoisoned)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_errors_map_to_app_errors() {
        let err = AppError::from(ProductServiceError::NotFound(ProductId::new(5)));
        assert!(matches!(err, AppError::NotFound(id) if id == ProductId::new(5)));

        let err = AppError::from(ProductServiceError::Repository(
            RepositoryError::DataCorruption("bad row".into()),
        ));
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_not_found_has_empty_body() {
        let response = AppError::NotFound(ProductId::new(1)).into_response();
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_validation_body_lists_fields() {
        let errors = ProductInput::default().validate().unwrap_err();
        let response = AppError::Validation(errors).into_response();

        let body: Value = serde_json::from_slice(&body_of(response).await).unwrap();
        let pointers: Vec<_> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["source"]["pointer"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(
            pointers,
            vec!["/data/attributes/name", "/data/attributes/price"]
        );
    }

    #[tokio::test]
    async fn test_panic_payload_becomes_internal_error() {
        let response = panic_response(Box::new("store exploded"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(body["errors"][0]["detail"], "Internal error: store exploded");

        let response = panic_response(Box::new(42_u8));
        let body: Value = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(body["errors"][0]["detail"], "Internal error: handler panicked");
    }

    #[tokio::test]
    async fn test_internal_body_carries_message() {
        let response = AppError::Internal("disk on fire".to_string()).into_response();

        let body: Value = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(body["errors"][0]["status"], 500);
        assert_eq!(body["errors"][0]["title"], "Internal Server Error");
        assert_eq!(body["errors"][0]["detail"], "Internal error: disk on fire");
    }
}
