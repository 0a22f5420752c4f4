//! Application state shared across handlers.

use std::sync::Arc;

use crate::services::ProductService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the product service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    products: ProductService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(products: ProductService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { products }),
        }
    }

    /// Get a reference to the product service.
    #[must_use]
    pub fn products(&self) -> &ProductService {
        &self.inner.products
    }
}
