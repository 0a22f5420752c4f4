//! In-memory product store.
//!
//! All state sits behind one `RwLock`: the id counter and the map are updated
//! in the same write section, so concurrent creates get distinct, strictly
//! increasing ids with no gaps, and readers only ever see whole products.
//! The lock is never held across an `.await`.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use products_core::{Product, ProductFields, ProductId};

use super::{ProductStore, RepositoryError};

#[derive(Debug)]
struct Inner {
    next_id: i64,
    products: BTreeMap<ProductId, Product>,
}

/// Process-local product store.
#[derive(Debug)]
pub struct MemoryProductStore {
    inner: RwLock<Inner>,
}

impl MemoryProductStore {
    /// Create an empty store whose first id is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                products: BTreeMap::new(),
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, RepositoryError> {
        self.inner.read().map_err(|_| RepositoryError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, RepositoryError> {
        self.inner.write().map_err(|_| RepositoryError::LockPoisoned)
    }
}

impl Default for MemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn save(&self, product: Product) -> Result<Product, RepositoryError> {
        let mut inner = self.write()?;

        let (id, product, next_id) = match product.id() {
            Some(id) => {
                // Keep the counter ahead of ids supplied by callers
                let after = id
                    .as_i64()
                    .checked_add(1)
                    .ok_or(RepositoryError::IdSpaceExhausted(id))?;
                (id, product, inner.next_id.max(after))
            }
            None => {
                let id = ProductId::new(inner.next_id);
                let after = inner
                    .next_id
                    .checked_add(1)
                    .ok_or(RepositoryError::IdSpaceExhausted(id))?;
                (id, product.assign_id(id), after)
            }
        };

        inner.next_id = next_id;
        inner.products.insert(id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    async fn exists_by_id(&self, id: ProductId) -> Result<bool, RepositoryError> {
        Ok(self.read()?.products.contains_key(&id))
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<bool, RepositoryError> {
        Ok(self.write()?.products.remove(&id).is_some())
    }

    async fn replace_fields(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut inner = self.write()?;
        let Some(existing) = inner.products.get_mut(&id) else {
            return Ok(None);
        };

        let updated = existing.with_fields(fields);
        *existing = updated.clone();
        Ok(Some(updated))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    fn product(name: &str) -> Product {
        Product::new(name, 10.0, None).unwrap()
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let store = MemoryProductStore::new();

        let first = store.save(product("A")).await.unwrap();
        let second = store.save(product("B")).await.unwrap();

        assert_eq!(first.id(), Some(ProductId::new(1)));
        assert_eq!(second.id(), Some(ProductId::new(2)));
    }

    #[tokio::test]
    async fn test_save_with_id_replaces_entry() {
        let store = MemoryProductStore::new();
        let stored = store.save(product("A")).await.unwrap();

        let fields = ProductFields::new("A2", 20.0, Some("new".into())).unwrap();
        store.save(stored.with_fields(fields)).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name(), "A2");
        assert_eq!(all[0].price(), 20.0);
    }

    #[tokio::test]
    async fn test_find_by_id_miss_is_none() {
        let store = MemoryProductStore::new();
        assert!(store.find_by_id(ProductId::new(99)).await.unwrap().is_none());
        assert!(!store.exists_by_id(ProductId::new(99)).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_all_is_in_insertion_order() {
        let store = MemoryProductStore::new();
        for name in ["first", "second", "third"] {
            store.save(product(name)).await.unwrap();
        }

        let names: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|p| p.name().to_owned())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_delete_absent_id_is_noop() {
        let store = MemoryProductStore::new();
        store.save(product("A")).await.unwrap();

        assert!(!store.delete_by_id(ProductId::new(42)).await.unwrap());

        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let store = MemoryProductStore::new();
        let stored = store.save(product("A")).await.unwrap();
        let id = stored.id().unwrap();

        assert!(store.delete_by_id(id).await.unwrap());

        assert!(!store.exists_by_id(id).await.unwrap());
        assert!(!store.delete_by_id(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = MemoryProductStore::new();
        let first = store.save(product("A")).await.unwrap();
        store.delete_by_id(first.id().unwrap()).await.unwrap();

        let second = store.save(product("B")).await.unwrap();
        assert_eq!(second.id(), Some(ProductId::new(2)));
    }

    #[tokio::test]
    async fn test_save_with_supplied_id_moves_counter_past_it() {
        let store = MemoryProductStore::new();
        let restored = Product::restore(ProductId::new(10), "A", 1.0, None).unwrap();

        store.save(restored).await.unwrap();
        let next = store.save(product("B")).await.unwrap();

        assert_eq!(next.id(), Some(ProductId::new(11)));
    }

    #[tokio::test]
    async fn test_save_at_id_ceiling_is_rejected_and_store_stays_usable() {
        let store = MemoryProductStore::new();
        let at_ceiling = Product::restore(ProductId::new(i64::MAX), "A", 1.0, None).unwrap();

        let err = store.save(at_ceiling).await.unwrap_err();
        assert!(matches!(err, RepositoryError::IdSpaceExhausted(id) if id.as_i64() == i64::MAX));

        let next = store.save(product("B")).await.unwrap();
        assert_eq!(next.id(), Some(ProductId::new(1)));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_fields_on_missing_id_leaves_store_unchanged() {
        let store = MemoryProductStore::new();
        store.save(product("A")).await.unwrap();

        let fields = ProductFields::new("B", 1.0, None).unwrap();
        let result = store.replace_fields(ProductId::new(7), fields).await.unwrap();

        assert!(result.is_none());
        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name(), "A");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_get_distinct_gap_free_ids() {
        const N: i64 = 200;
        let store = Arc::new(MemoryProductStore::new());

        let handles: Vec<_> = (0..N)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.save(product(&format!("p{i}"))).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let saved = handle.await.unwrap().unwrap();
            ids.insert(saved.id().unwrap().as_i64());
        }

        let expected: HashSet<i64> = (1..=N).collect();
        assert_eq!(ids, expected);
        assert_eq!(store.find_all().await.unwrap().len(), 200);
    }
}
