//! The product entity.
//!
//! A [`Product`] can only be built from values that satisfy its invariants:
//! the name is not blank and the price is a positive finite number. The
//! identifier is absent until a store assigns one and never changes after
//! that; updates go through [`Product::with_fields`], which returns a new
//! value carrying the original id.

use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::ProductId;

/// Errors raised when a product would violate its invariants.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductError {
    /// The name is empty or whitespace-only.
    #[error("Product name cannot be null or empty")]
    BlankName,
    /// The price is zero, negative or not a finite number.
    #[error("Product price must be positive")]
    NonPositivePrice,
}

/// The mutable part of a product, already validated.
///
/// Produced by [`ProductFields::new`] or by validating a
/// [`ProductInput`](crate::ProductInput).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    name: String,
    price: f64,
    description: Option<String>,
}

impl ProductFields {
    /// Validate and bundle the fields of a product.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::BlankName`] if `name` is empty or whitespace,
    /// and [`ProductError::NonPositivePrice`] if `price` is not a positive
    /// finite number. The name is checked first.
    pub fn new(
        name: impl Into<String>,
        price: f64,
        description: Option<String>,
    ) -> Result<Self, ProductError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProductError::BlankName);
        }
        if !is_positive_price(price) {
            return Err(ProductError::NonPositivePrice);
        }

        Ok(Self {
            name,
            price,
            description,
        })
    }

    /// The product name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The product price.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// The optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Whether `price` is acceptable as a product price.
pub(crate) fn is_positive_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// A product.
///
/// Two products are equal when both have an id and the ids match; a product
/// that has not been stored yet is equal to nothing, not even itself. The
/// hash only covers the id, so equal products always hash the same.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    id: Option<ProductId>,
    name: String,
    price: f64,
    description: Option<String>,
}

impl Product {
    /// Create a product that has not been stored yet.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] if the name is blank or the price is not
    /// positive.
    pub fn new(
        name: impl Into<String>,
        price: f64,
        description: Option<String>,
    ) -> Result<Self, ProductError> {
        ProductFields::new(name, price, description).map(Self::from_fields)
    }

    /// Rebuild a stored product, e.g. from a database row.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] if the stored values violate the invariants.
    pub fn restore(
        id: ProductId,
        name: impl Into<String>,
        price: f64,
        description: Option<String>,
    ) -> Result<Self, ProductError> {
        Ok(Self::new(name, price, description)?.assign_id(id))
    }

    /// Create an unsaved product from validated fields.
    #[must_use]
    pub fn from_fields(fields: ProductFields) -> Self {
        Self {
            id: None,
            name: fields.name,
            price: fields.price,
            description: fields.description,
        }
    }

    /// Attach the identifier chosen by a store.
    ///
    /// Stores call this exactly once, when a product is first saved. An id
    /// that is already present is kept.
    #[must_use]
    pub fn assign_id(mut self, id: ProductId) -> Self {
        if self.id.is_none() {
            self.id = Some(id);
        }
        self
    }

    /// Return a new product with the same id and the given fields.
    #[must_use]
    pub fn with_fields(&self, fields: ProductFields) -> Self {
        Self {
            id: self.id,
            name: fields.name,
            price: fields.price,
            description: fields.description,
        }
    }

    /// The store-assigned id, if the product has been saved.
    #[must_use]
    pub const fn id(&self) -> Option<ProductId> {
        self.id
    }

    /// The product name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The product price.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// The optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
