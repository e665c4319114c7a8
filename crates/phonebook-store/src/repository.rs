//! PhoneRepository — phone/address operations over a [`KeyValueStore`].
//!
//! Each method is exactly one store round-trip. Existence and conflict
//! rules ride on the store's conditional writes, so two concurrent creates
//! of the same phone can never both succeed.

use tracing::debug;

use crate::error::StoreResult;
use crate::kv::KeyValueStore;

#[derive(Debug, Clone)]
pub struct PhoneRepository<S> {
    store: S,
}

impl<S: KeyValueStore> PhoneRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Address registered for `phone`, if any.
    pub async fn get(&self, phone: &str) -> StoreResult<Option<String>> {
        self.store.get(phone).await
    }

    /// Register `phone` only if it is not registered yet. Returns whether it was.
    pub async fn create(&self, phone: &str, address: &str) -> StoreResult<bool> {
        self.store.set_if_absent(phone, address).await
    }

    /// Replace the address of an existing `phone`. Returns whether it existed.
    pub async fn update(&self, phone: &str, address: &str) -> StoreResult<bool> {
        self.store.set_if_present(phone, address).await
    }

    /// Remove `phone`. Returns whether anything was removed.
    pub async fn delete(&self, phone: &str) -> StoreResult<bool> {
        Ok(self.store.delete(phone).await? > 0)
    }

    /// Liveness check. Never fails: any error reads as `false`.
    pub async fn ping(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "store ping failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    const PHONE: &str = "+12345678901";

    fn repo() -> (PhoneRepository<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        (PhoneRepository::new(store.clone()), store)
    }

    #[tokio::test]
    async fn create_then_get() {
        let (repo, _) = repo();
        assert!(repo.create(PHONE, "One").await.unwrap());
        assert_eq!(repo.get(PHONE).await.unwrap().as_deref(), Some("One"));
    }

    #[tokio::test]
    async fn duplicate_create_keeps_first_address() {
        let (repo, _) = repo();
        assert!(repo.create(PHONE, "One").await.unwrap());
        assert!(!repo.create(PHONE, "Two").await.unwrap());
        assert_eq!(repo.get(PHONE).await.unwrap().as_deref(), Some("One"));
    }

    #[tokio::test]
    async fn update_missing_creates_nothing() {
        let (repo, store) = repo();
        assert!(!repo.update(PHONE, "X").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let (repo, _) = repo();
        repo.create(PHONE, "One").await.unwrap();
        assert!(repo.delete(PHONE).await.unwrap());
        assert!(!repo.delete(PHONE).await.unwrap());
        assert_eq!(repo.get(PHONE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ping_swallows_errors() {
        let (repo, store) = repo();
        assert!(repo.ping().await);
        store.set_available(false);
        assert!(!repo.ping().await);
    }

    #[tokio::test]
    async fn unavailable_store_propagates_from_data_operations() {
        let (repo, store) = repo();
        store.set_available(false);
        assert!(repo.get(PHONE).await.unwrap_err().is_unavailable());
        assert!(repo.create(PHONE, "One").await.unwrap_err().is_unavailable());
        assert!(repo.update(PHONE, "One").await.unwrap_err().is_unavailable());
        assert!(repo.delete(PHONE).await.unwrap_err().is_unavailable());
    }
}
