//! Integration tests for the products service.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process HTTP tests against the in-memory store
//! cargo test -p products-integration-tests
//!
//! # Include the PostgreSQL store tests
//! PRODUCTS_TEST_DATABASE_URL=postgres://localhost/products_test \
//!     cargo test -p products-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `products_api` - HTTP contract of the products endpoints
//! - `postgres_store` - The same contract over a real database
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`, so no
//! port is bound. [`FailingStore`] and [`PanickingStore`] stand in for a
//! broken backend.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use products_core::{Product, ProductFields, ProductId};
use products_server::db::{MemoryProductStore, ProductStore, RepositoryError};
use products_server::routes;
use products_server::services::ProductService;
use products_server::state::AppState;

/// Environment variable holding the database used by the ignored tests.
pub const TEST_DATABASE_URL_VAR: &str = "PRODUCTS_TEST_DATABASE_URL";

/// A response with its body already collected.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }
}

/// The full application router over a chosen store.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Application backed by a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryProductStore::new()))
    }

    /// Application backed by the given store.
    #[must_use]
    pub fn with_store(store: Arc<dyn ProductStore>) -> Self {
        let state = AppState::new(ProductService::new(store));
        Self {
            router: routes::app(state),
        }
    }

    /// Send a request through the router and collect the response.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Send a request with a raw JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn send_raw(&self, method: Method, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .expect("valid request");
        self.send(request).await
    }

    /// `GET` a path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::get(uri).body(Body::empty()).expect("valid request");
        self.send(request).await
    }

    /// `POST` a JSON value.
    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.send_raw(Method::POST, uri, &body.to_string()).await
    }

    /// `PUT` a JSON value.
    pub async fn put(&self, uri: &str, body: &Value) -> TestResponse {
        self.send_raw(Method::PUT, uri, &body.to_string()).await
    }

    /// `DELETE` a path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn delete(&self, uri: &str) -> TestResponse {
        let request = Request::delete(uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }
}

/// A store whose every call fails as if the database were unreachable.
#[derive(Debug, Default)]
pub struct FailingStore;

fn unreachable_database() -> RepositoryError {
    RepositoryError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl ProductStore for FailingStore {
    async fn save(&self, _product: Product) -> Result<Product, RepositoryError> {
        Err(unreachable_database())
    }

    async fn find_by_id(&self, _id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Err(unreachable_database())
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Err(unreachable_database())
    }

    async fn exists_by_id(&self, _id: ProductId) -> Result<bool, RepositoryError> {
        Err(unreachable_database())
    }

    async fn delete_by_id(&self, _id: ProductId) -> Result<bool, RepositoryError> {
        Err(unreachable_database())
    }

    async fn replace_fields(
        &self,
        _id: ProductId,
        _fields: ProductFields,
    ) -> Result<Option<Product>, RepositoryError> {
        Err(unreachable_database())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Err(unreachable_database())
    }
}

/// A store that panics on reads and otherwise behaves like an empty
/// in-memory store.
#[derive(Debug, Default)]
pub struct PanickingStore {
    inner: MemoryProductStore,
}

#[async_trait]
impl ProductStore for PanickingStore {
    async fn save(&self, product: Product) -> Result<Product, RepositoryError> {
        self.inner.save(product).await
    }

    async fn find_by_id(&self, _id: ProductId) -> Result<Option<Product>, RepositoryError> {
        panic!("index corrupted")
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        panic!("index corrupted")
    }

    async fn exists_by_id(&self, id: ProductId) -> Result<bool, RepositoryError> {
        self.inner.exists_by_id(id).await
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<bool, RepositoryError> {
        self.inner.delete_by_id(id).await
    }

    async fn replace_fields(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Option<Product>, RepositoryError> {
        self.inner.replace_fields(id, fields).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.inner.ping().await
    }
}
