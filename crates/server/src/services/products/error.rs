//! Product service error types.

use thiserror::Error;

use products_core::ProductId;

use crate::db::RepositoryError;

/// Errors that can occur during product operations.
#[derive(Debug, Error)]
pub enum ProductServiceError {
    /// No product with this id exists.
    #[error("Product with id {0} not found")]
    NotFound(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
