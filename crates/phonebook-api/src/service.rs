//! PhoneService — existence and conflict rules over the repository.
//!
//! Store connectivity failures are normalized here, once: callers above the
//! service only ever see [`ServiceError`].

use phonebook_store::{KeyValueStore, PhoneRepository, StoreError};
use tracing::{error, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::schemas::{
    AddressUpdate, HealthResponse, MessageResponse, PhoneAddressCreate, PhoneAddressResponse,
};

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(reason) => {
                warn!(%reason, "redis is unavailable");
                ServiceError::Unavailable
            }
            StoreError::Command(reason) => {
                error!(%reason, "unexpected store reply");
                ServiceError::Internal(reason)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PhoneService<S> {
    repository: PhoneRepository<S>,
}

impl<S: KeyValueStore> PhoneService<S> {
    pub fn new(repository: PhoneRepository<S>) -> Self {
        Self { repository }
    }

    pub async fn get_phone(&self, phone: &str) -> ServiceResult<PhoneAddressResponse> {
        match self.repository.get(phone).await? {
            Some(address) => Ok(PhoneAddressResponse {
                phone: phone.to_string(),
                address,
            }),
            None => Err(ServiceError::NotFound),
        }
    }

    pub async fn create_phone(&self, data: &PhoneAddressCreate) -> ServiceResult<MessageResponse> {
        if !self.repository.create(&data.phone, &data.address).await? {
            return Err(ServiceError::Conflict);
        }
        Ok(MessageResponse::new("Created successfully"))
    }

    pub async fn update_address(
        &self,
        phone: &str,
        data: &AddressUpdate,
    ) -> ServiceResult<MessageResponse> {
        if !self.repository.update(phone, &data.address).await? {
            return Err(ServiceError::NotFound);
        }
        Ok(MessageResponse::new("Updated successfully"))
    }

    pub async fn delete_phone(&self, phone: &str) -> ServiceResult<()> {
        if !self.repository.delete(phone).await? {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    /// Store liveness. Never fails.
    pub async fn health(&self) -> HealthResponse {
        HealthResponse {
            redis: self.repository.ping().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonebook_store::MemoryStore;

    const PHONE: &str = "+12345678901";

    fn service() -> (PhoneService<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        (PhoneService::new(PhoneRepository::new(store.clone())), store)
    }

    fn create(phone: &str, address: &str) -> PhoneAddressCreate {
        PhoneAddressCreate {
            phone: phone.to_string(),
            address: address.to_string(),
        }
    }

    fn update(address: &str) -> AddressUpdate {
        AddressUpdate {
            address: address.to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_get() {
        let (svc, _) = service();
        let msg = svc.create_phone(&create(PHONE, "One")).await.unwrap();
        assert_eq!(msg.message, "Created successfully");

        let record = svc.get_phone(PHONE).await.unwrap();
        assert_eq!(record.phone, PHONE);
        assert_eq!(record.address, "One");
    }

    #[tokio::test]
    async fn duplicate_create_conflicts() {
        let (svc, store) = service();
        svc.create_phone(&create(PHONE, "One")).await.unwrap();
        let err = svc.create_phone(&create(PHONE, "Two")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict));
        assert_eq!(store.peek(PHONE).as_deref(), Some("One"));
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let (svc, _) = service();
        assert!(matches!(svc.get_phone(PHONE).await, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn update_existing_and_missing() {
        let (svc, store) = service();
        assert!(matches!(
            svc.update_address(PHONE, &update("X")).await,
            Err(ServiceError::NotFound)
        ));
        assert!(store.is_empty());

        svc.create_phone(&create(PHONE, "Old")).await.unwrap();
        let msg = svc.update_address(PHONE, &update("New")).await.unwrap();
        assert_eq!(msg.message, "Updated successfully");
        assert_eq!(svc.get_phone(PHONE).await.unwrap().address, "New");
    }

    #[tokio::test]
    async fn delete_existing_and_missing() {
        let (svc, _) = service();
        svc.create_phone(&create(PHONE, "Addr")).await.unwrap();
        svc.delete_phone(PHONE).await.unwrap();
        assert!(matches!(svc.delete_phone(PHONE).await, Err(ServiceError::NotFound)));
        assert!(matches!(svc.get_phone(PHONE).await, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn unavailable_store_is_normalized() {
        let (svc, store) = service();
        store.set_available(false);

        assert!(matches!(svc.get_phone(PHONE).await, Err(ServiceError::Unavailable)));
        assert!(matches!(
            svc.create_phone(&create(PHONE, "One")).await,
            Err(ServiceError::Unavailable)
        ));
        assert!(matches!(
            svc.update_address(PHONE, &update("One")).await,
            Err(ServiceError::Unavailable)
        ));
        assert!(matches!(svc.delete_phone(PHONE).await, Err(ServiceError::Unavailable)));
    }

    #[tokio::test]
    async fn health_reflects_store() {
        let (svc, store) = service();
        assert_eq!(svc.health().await, HealthResponse { redis: true });
        store.set_available(false);
        assert_eq!(svc.health().await, HealthResponse { redis: false });
    }

    #[test]
    fn command_errors_become_internal() {
        let err: ServiceError = StoreError::Command("WRONGTYPE".to_string()).into();
        assert!(matches!(err, ServiceError::Internal(ref r) if r == "WRONGTYPE"));
    }
}
