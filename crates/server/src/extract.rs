//! Request extractors that report rejections as JSON-API errors.
//!
//! Wrappers around axum's `Json` and `Path` whose rejections become
//! [`AppError::BadRequest`](crate::error::AppError::BadRequest) instead of
//! axum's plain-text responses.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
