//! Product route handlers.
//!
//! Request bodies are validated with [`ProductInput::validate`] before the
//! service is called, for both create and update. Single products are
//! answered with a JSON-API document; the list is a bare array.

use axum::{Json, extract::State, http::StatusCode};

use products_core::{Product, ProductId, ProductInput};

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::json_api::Document;
use crate::state::AppState;

/// Create a product.
///
/// # Errors
///
/// Returns `AppError::Validation` for invalid attributes, `AppError::BadRequest`
/// for an unreadable body, or a server error if the store fails.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<(StatusCode, Json<Document<Product>>)> {
    let fields = input.validate().map_err(AppError::Validation)?;
    let product = state.products().create_product(fields).await?;
    Ok((StatusCode::CREATED, Json(Document::product(product))))
}

/// List every product.
///
/// # Errors
///
/// Returns a server error if the store fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.products().get_all_products().await?;
    Ok(Json(products))
}

/// Show one product.
///
/// # Errors
///
/// Returns `AppError::NotFound` when no product has this id.
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Document<Product>>> {
    let product = state
        .products()
        .get_product_by_id(id)
        .await?
        .ok_or(AppError::NotFound(id))?;
    Ok(Json(Document::product(product)))
}

/// Replace the attributes of a product.
///
/// # Errors
///
/// Returns `AppError::Validation` for invalid attributes or
/// `AppError::NotFound` when no product has this id.
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<Json<Document<Product>>> {
    let fields = input.validate().map_err(AppError::Validation)?;
    let product = state.products().update_product(id, fields).await?;
    Ok(Json(Document::product(product)))
}

/// Delete a product.
///
/// # Errors
///
/// Returns `AppError::NotFound` when no product has this id.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<StatusCode> {
    state.products().delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
