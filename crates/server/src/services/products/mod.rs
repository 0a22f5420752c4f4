//! Product CRUD service.
//!
//! The only place where products are created, changed or removed. The
//! service holds no state of its own; it turns "absent in the store" into
//! [`ProductServiceError::NotFound`] for update and delete, while reads
//! simply report absence.

mod error;

use std::sync::Arc;

use tracing::{debug, info, instrument};

use products_core::{Product, ProductFields, ProductId};

use crate::db::ProductStore;

pub use error::ProductServiceError;

/// Product operations on top of a [`ProductStore`].
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    /// Create a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// Get a reference to the underlying store.
    #[must_use]
    pub fn store(&self) -> &dyn ProductStore {
        self.store.as_ref()
    }

    /// Store a new product and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `ProductServiceError::Repository` if the store fails.
    #[instrument(skip_all)]
    pub async fn create_product(
        &self,
        fields: ProductFields,
    ) -> Result<Product, ProductServiceError> {
        let product = self.store.save(Product::from_fields(fields)).await?;
        info!(product_id = ?product.id(), name = %product.name(), "Product created");
        Ok(product)
    }

    /// Every stored product.
    ///
    /// # Errors
    ///
    /// Returns `ProductServiceError::Repository` if the store fails.
    #[instrument(skip(self))]
    pub async fn get_all_products(&self) -> Result<Vec<Product>, ProductServiceError> {
        let products = self.store.find_all().await?;
        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Look up one product. A missing id is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `ProductServiceError::Repository` if the store fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product_by_id(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, ProductServiceError> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Replace name, price and description of an existing product.
    ///
    /// # Errors
    ///
    /// Returns `ProductServiceError::NotFound` if no product has this id, or
    /// `ProductServiceError::Repository` if the store fails.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Product, ProductServiceError> {
        let updated = self
            .store
            .replace_fields(id, fields)
            .await?
            .ok_or(ProductServiceError::NotFound(id))?;
        info!("Product updated");
        Ok(updated)
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductServiceError::NotFound` if no product has this id, or
    /// `ProductServiceError::Repository` if the store fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ProductServiceError> {
        if !self.store.delete_by_id(id).await? {
            return Err(ProductServiceError::NotFound(id));
        }
        info!("Product deleted");
        Ok(())
    }
}
