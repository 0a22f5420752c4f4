//! `PostgreSQL` store tests.
//!
//! These need a disposable database named by `PRODUCTS_TEST_DATABASE_URL`.
//! The `products` table is dropped and recreated, so never point this at a
//! database holding real data. Everything runs inside one test so the steps
//! never race on the shared table.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::http::StatusCode;
use secrecy::SecretString;
use serde_json::json;

use products_core::{Product, ProductFields, ProductId};
use products_integration_tests::{TEST_DATABASE_URL_VAR, TestApp};
use products_server::db::{self, PgProductStore, ProductStore};

async fn fresh_store() -> PgProductStore {
    let url = std::env::var(TEST_DATABASE_URL_VAR)
        .unwrap_or_else(|_| panic!("{TEST_DATABASE_URL_VAR} must be set"));
    let pool = db::create_pool(&SecretString::from(url)).await.unwrap();

    sqlx::query("DROP TABLE IF EXISTS products")
        .execute(&pool)
        .await
        .unwrap();

    let store = PgProductStore::new(pool);
    store.ensure_schema().await.unwrap();
    store
}

#[tokio::test]
#[ignore = "requires PRODUCTS_TEST_DATABASE_URL"]
async fn test_postgres_store_end_to_end() {
    let store = fresh_store().await;

    // Store level
    store.ping().await.unwrap();
    assert!(store.find_all().await.unwrap().is_empty());
    assert!(
        store
            .replace_fields(
                ProductId::new(1),
                ProductFields::new("Ghost", 1.0, None).unwrap()
            )
            .await
            .unwrap()
            .is_none()
    );

    // Supplied ids push the sequence forward, never back
    let restored = Product::restore(ProductId::new(5), "Restored", 2.0, None).unwrap();
    store.save(restored).await.unwrap();
    let next = store
        .save(Product::new("Fresh", 3.0, None).unwrap())
        .await
        .unwrap();
    assert_eq!(next.id(), Some(ProductId::new(6)));

    let earlier = Product::restore(ProductId::new(2), "Earlier", 4.0, None).unwrap();
    store.save(earlier).await.unwrap();
    let after = store
        .save(Product::new("After", 5.0, None).unwrap())
        .await
        .unwrap();
    assert_eq!(after.id(), Some(ProductId::new(7)));

    for id in [2, 5, 6, 7] {
        assert!(store.delete_by_id(ProductId::new(id)).await.unwrap());
    }
    assert!(!store.delete_by_id(ProductId::new(5)).await.unwrap());

    // HTTP level over the same table
    let app = TestApp::with_store(Arc::new(store.clone()));

    let created = app
        .post(
            "/api/v1/products",
            &json!({ "name": "Mouse", "price": 25.0, "description": "Wireless" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.json()["data"]["attributes"]["id"].as_i64().unwrap();

    let updated = app
        .put(
            &format!("/api/v1/products/{id}"),
            &json!({ "name": "Trackball", "price": 60.0 }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(
        updated.json()["data"]["attributes"],
        json!({ "id": id, "name": "Trackball", "price": 60.0, "description": null })
    );

    let listed = app.get("/api/v1/products").await.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    assert_eq!(
        app.delete(&format!("/api/v1/products/{id}")).await.status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        app.delete(&format!("/api/v1/products/{id}")).await.status,
        StatusCode::NOT_FOUND
    );
    assert!(!store.exists_by_id(ProductId::new(id)).await.unwrap());

    let ready = app.get("/health/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
}
