//! JSON-API style response documents.
//!
//! Single resources are wrapped as `{"data": {"type", "attributes"}}`;
//! failures as `{"errors": [...]}`. Collections are returned as a bare
//! array by the list handler and do not go through this module.

use axum::http::StatusCode;
use serde::Serialize;

use products_core::{FieldError, Product};

/// Resource type name for products.
pub const PRODUCT_TYPE: &str = "product";

/// Title used for field validation failures.
pub const VALIDATION_ERROR_TITLE: &str = "Validation Error";

/// Title used for malformed requests.
pub const INVALID_REQUEST_TITLE: &str = "Invalid Request";

/// Title used for unexpected server failures.
pub const INTERNAL_ERROR_TITLE: &str = "Internal Server Error";

/// Top-level document carrying one resource.
#[derive(Debug, Serialize)]
pub struct Document<T> {
    pub data: Resource<T>,
}

/// A typed resource object.
#[derive(Debug, Serialize)]
pub struct Resource<T> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: T,
}

impl Document<Product> {
    /// Wrap a product.
    #[must_use]
    pub fn product(product: Product) -> Self {
        Self {
            data: Resource {
                kind: PRODUCT_TYPE,
                attributes: product,
            },
        }
    }
}

/// Top-level document carrying errors.
#[derive(Debug, Serialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

/// One error entry.
#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub status: u16,
    pub title: &'static str,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
}

/// Where in the request document an error originated.
#[derive(Debug, Serialize)]
pub struct ErrorSource {
    pub pointer: String,
}

impl ErrorObject {
    /// Error for one invalid attribute, pointing at `/data/attributes/<field>`.
    #[must_use]
    pub fn validation(error: &FieldError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST.as_u16(),
            title: VALIDATION_ERROR_TITLE,
            detail: error.message.clone(),
            source: Some(ErrorSource {
                pointer: format!("/data/attributes/{}", error.field),
            }),
        }
    }

    /// Error for a request that could not be read at all.
    #[must_use]
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST.as_u16(),
            title: INVALID_REQUEST_TITLE,
            detail: detail.into(),
            source: None,
        }
    }

    /// Error for an unexpected failure.
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            title: INTERNAL_ERROR_TITLE,
            detail: detail.into(),
            source: None,
        }
    }
}

impl From<Vec<ErrorObject>> for ErrorDocument {
    fn from(errors: Vec<ErrorObject>) -> Self {
        Self { errors }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use products_core::{ProductId, ProductInput};

    use super::*;

    #[test]
    fn test_product_document_shape() {
        let product =
            Product::restore(ProductId::new(1), "Mouse", 25.0, Some("Wireless".into())).unwrap();

        let value = serde_json::to_value(Document::product(product)).unwrap();

        assert_eq!(
            value,
            json!({
                "data": {
                    "type": "product",
                    "attributes": {
                        "id": 1,
                        "name": "Mouse",
                        "price": 25.0,
                        "description": "Wireless"
                    }
                }
            })
        );
    }

    #[test]
    fn test_validation_errors_point_at_attributes() {
        let field_errors = ProductInput::default().validate().unwrap_err();
        let document = ErrorDocument::from(
            field_errors
                .iter()
                .map(ErrorObject::validation)
                .collect::<Vec<_>>(),
        );

        let value = serde_json::to_value(document).unwrap();

        assert_eq!(
            value,
            json!({
                "errors": [
                    {
                        "status": 400,
                        "title": "Validation Error",
                        "detail": "Product name cannot be blank",
                        "source": { "pointer": "/data/attributes/name" }
                    },
                    {
                        "status": 400,
                        "title": "Validation Error",
                        "detail": "Product price must be positive",
                        "source": { "pointer": "/data/attributes/price" }
                    }
                ]
            })
        );
    }

    #[test]
    fn test_internal_error_has_no_source() {
        let value = serde_json::to_value(ErrorObject::internal("boom")).unwrap();
        assert_eq!(
            value,
            json!({ "status": 500, "title": "Internal Server Error", "detail": "boom" })
        );
    }
}
