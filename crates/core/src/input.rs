//! Request shape for creating and updating products.
//!
//! [`ProductInput`] is what clients send. It is deliberately loose (every
//! field optional) so that a missing field is reported as a validation error
//! rather than a deserialization failure. [`ProductInput::validate`] checks
//! every field and either returns [`ProductFields`] or the full list of
//! problems.

use serde::{Deserialize, Serialize};

use crate::product::{ProductFields, is_positive_price};

/// Message reported when the name is missing or blank.
pub const NAME_BLANK_MESSAGE: &str = "Product name cannot be blank";

/// Message reported when the price is missing or not positive.
pub const PRICE_NOT_POSITIVE_MESSAGE: &str = "Product price must be positive";

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Attribute name as it appears in the request body.
    pub field: &'static str,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_owned(),
        }
    }
}

/// Product attributes as sent by a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Product name (required, not blank).
    #[serde(default)]
    pub name: Option<String>,
    /// Product price (required, greater than zero).
    #[serde(default)]
    pub price: Option<f64>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductInput {
    /// Check every field and convert to [`ProductFields`].
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per invalid field, in `name`, `price` order.
    pub fn validate(self) -> Result<ProductFields, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = match self.name {
            Some(name) if !name.trim().is_empty() => Some(name),
            _ => {
                errors.push(FieldError::new("name", NAME_BLANK_MESSAGE));
                None
            }
        };

        let price = match self.price {
            Some(price) if is_positive_price(price) => Some(price),
            _ => {
                errors.push(FieldError::new("price", PRICE_NOT_POSITIVE_MESSAGE));
                None
            }
        };

        match (name, price) {
            (Some(name), Some(price)) => ProductFields::new(name, price, self.description)
                .map_err(|e| vec![FieldError::new("data", &e.to_string())]),
            _ => Err(errors),
        }
    }
}
