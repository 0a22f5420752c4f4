//! `PostgreSQL` product store.
//!
//! Queries use runtime-checked `sqlx::query_as` with a [`ProductRow`] so the
//! crate builds without a live database. Rows are turned back into
//! [`Product`] through the validating constructor; a row that breaks the
//! entity invariants is reported as [`RepositoryError::DataCorruption`].

use async_trait::async_trait;
use sqlx::PgPool;

use products_core::{Product, ProductFields, ProductId};

use super::{ProductStore, RepositoryError};

/// Table definition applied by [`PgProductStore::ensure_schema`].
const CREATE_PRODUCTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS products (
        id          BIGSERIAL PRIMARY KEY,
        name        TEXT NOT NULL,
        price       DOUBLE PRECISION NOT NULL CHECK (price > 0),
        description VARCHAR(500)
    )
";

/// Moves the id sequence past a caller-supplied id (`$1`), never backwards.
/// A fresh sequence stays uncalled unless the id reaches its first value.
const ADVANCE_ID_SEQUENCE: &str = r"
    SELECT setval('products_id_seq', GREATEST($1, last_value), is_called OR $1 >= last_value)
    FROM products_id_seq
";

/// Raw row from the `products` table.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    price: f64,
    description: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Self::restore(row.id, row.name, row.price, row.description).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid product {} in database: {e}", row.id))
        })
    }
}

/// Repository for the `products` table.
#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `products` table if it is missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_PRODUCTS_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn save(&self, product: Product) -> Result<Product, RepositoryError> {
        let row = match product.id() {
            None => {
                sqlx::query_as::<_, ProductRow>(
                    r"
                    INSERT INTO products (name, price, description)
                    VALUES ($1, $2, $3)
                    RETURNING id, name, price, description
                    ",
                )
                .bind(product.name())
                .bind(product.price())
                .bind(product.description())
                .fetch_one(&self.pool)
                .await?
            }
            Some(id) => {
                let mut tx = self.pool.begin().await?;

                let row = sqlx::query_as::<_, ProductRow>(
                    r"
                    INSERT INTO products (id, name, price, description)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (id) DO UPDATE
                    SET name = EXCLUDED.name,
                        price = EXCLUDED.price,
                        description = EXCLUDED.description
                    RETURNING id, name, price, description
                    ",
                )
                .bind(id)
                .bind(product.name())
                .bind(product.price())
                .bind(product.description())
                .fetch_one(&mut *tx)
                .await?;

                sqlx::query(ADVANCE_ID_SEQUENCE)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;

                tx.commit().await?;
                row
            }
        };

        row.try_into()
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, description FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Product::try_from)
        .transpose()
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, description FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Product::try_from)
        .collect()
    }

    async fn exists_by_id(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_fields(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, description FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(existing) = existing else {
            tx.rollback().await?;
            return Ok(None);
        };

        let updated = Product::try_from(existing)?.with_fields(fields);

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET name = $2, price = $3, description = $4
            WHERE id = $1
            RETURNING id, name, price, description
            ",
        )
        .bind(id)
        .bind(updated.name())
        .bind(updated.price())
        .bind(updated.description())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Product::try_from(row).map(Some)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
