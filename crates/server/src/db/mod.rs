//! Product storage.
//!
//! Products live behind the [`ProductStore`] trait so the service does not
//! care where they are kept. Two implementations exist:
//!
//! - [`MemoryProductStore`] - a process-local map guarded by a lock, with an
//!   id counter advanced in the same critical section as the insert
//! - [`PgProductStore`] - a `products` table in `PostgreSQL`
//!
//! # Table
//!
//! The `PostgreSQL` table is created on startup if it does not exist yet
//! (see [`PgProductStore::ensure_schema`]). There is no migration history.

pub mod memory;
pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use products_core::{Product, ProductFields, ProductId};

pub use memory::MemoryProductStore;
pub use products::PgProductStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A writer panicked while holding the in-memory store lock.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// No id above the given one fits in an `i64`.
    #[error("id space exhausted after {0}")]
    IdSpaceExhausted(ProductId),
}

/// Storage for products, keyed by id.
///
/// A missing id is never an error here: lookups return `None` and deletes
/// of absent ids report `false`. Callers decide what absence means.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a product without an id (assigning the next one) or replace
    /// the entry for the product's id. Returns the stored value.
    async fn save(&self, product: Product) -> Result<Product, RepositoryError>;

    /// Look up a product.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Snapshot of every stored product, ordered by id.
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Whether a product with this id is stored.
    async fn exists_by_id(&self, id: ProductId) -> Result<bool, RepositoryError>;

    /// Remove a product if present. Returns whether a product was removed,
    /// so of two racing deletes of the same id exactly one sees `true`.
    async fn delete_by_id(&self, id: ProductId) -> Result<bool, RepositoryError>;

    /// Atomically replace the fields of an existing product.
    ///
    /// Returns `None`, without touching the store, when the id is absent.
    async fn replace_fields(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Check that the store can serve requests.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
