use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::{
    RepositoryError, SignatureDevice, SignatureDeviceRepository, SignatureDeviceRepositoryProvider,
};

/// Volatile device store backed by a plain map. Not persisted across
/// restarts.
#[derive(Default)]
pub struct InMemorySignatureDeviceRepository {
    devices: HashMap<Uuid, SignatureDevice>,
}

impl InMemorySignatureDeviceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignatureDeviceRepository for InMemorySignatureDeviceRepository {
    fn create(&mut self, device: SignatureDevice) -> Result<(), RepositoryError> {
        if self.devices.contains_key(&device.id) {
            return Err(RepositoryError::DuplicateId(device.id));
        }

        self.devices.insert(device.id, device);
        Ok(())
    }

    fn find(&self, id: Uuid) -> Option<SignatureDevice> {
        self.devices.get(&id).cloned()
    }

    fn list(&self) -> Vec<SignatureDevice> {
        self.devices.values().cloned().collect()
    }

    fn mark_signature_created(
        &mut self,
        id: Uuid,
        signature: String,
    ) -> Result<(), RepositoryError> {
        let device = self
            .devices
            .get_mut(&id)
            .ok_or(RepositoryError::DeviceMissing(id))?;

        device.signature_counter += 1;
        device.last_signature = signature;

        tracing::debug!(
            device_id = %device.id,
            counter = device.signature_counter,
            "updated signature device"
        );

        Ok(())
    }
}

/// Wraps the in-memory repository in a reader-writer lock, implementing the
/// transaction scopes over it. A durable backend would replace this with a
/// database transaction adapter (e.g. `SELECT ... FOR UPDATE`).
#[derive(Default)]
pub struct InMemorySignatureDeviceRepositoryProvider {
    repository: RwLock<InMemorySignatureDeviceRepository>,
}

impl InMemorySignatureDeviceRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignatureDeviceRepositoryProvider for InMemorySignatureDeviceRepositoryProvider {
    type Repository = InMemorySignatureDeviceRepository;

    fn write_tx<T, E>(
        &self,
        tx: impl FnOnce(&mut Self::Repository) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut repository = self.repository.write();
        tx(&mut repository)
    }

    fn read_tx<T, E>(&self, tx: impl FnOnce(&Self::Repository) -> Result<T, E>) -> Result<T, E> {
        let repository = self.repository.read();
        tx(&repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{EccGenerator, RsaGenerator};

    fn test_device(id: Uuid, label: &str) -> SignatureDevice {
        SignatureDevice::build(id, &EccGenerator, Some(label.to_string())).unwrap()
    }

    #[test]
    fn create_persists_the_device() {
        let mut repository = InMemorySignatureDeviceRepository::new();
        let id = Uuid::parse_str("121fe402-762a-411a-8eeb-9e6c3ca16886").unwrap();

        repository.create(test_device(id, "my ecc key")).unwrap();

        let found = repository.find(id).unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.label, "my ecc key");
    }

    #[test]
    fn create_rejects_duplicate_id() {
        let mut repository = InMemorySignatureDeviceRepository::new();
        let id = Uuid::parse_str("121fe402-762a-411a-8eeb-9e6c3ca16886").unwrap();

        repository.create(test_device(id, "already existing key")).unwrap();
        let err = repository.create(test_device(id, "new key")).unwrap_err();

        assert_eq!(err, RepositoryError::DuplicateId(id));
        // the stored device is untouched
        assert_eq!(repository.find(id).unwrap().label, "already existing key");
        assert_eq!(repository.list().len(), 1);
    }

    #[test]
    fn find_returns_none_for_unknown_id() {
        let repository = InMemorySignatureDeviceRepository::new();
        assert!(repository.find(Uuid::nil()).is_none());
    }

    #[test]
    fn mark_signature_created_advances_counter_and_last_signature() {
        let mut repository = InMemorySignatureDeviceRepository::new();
        let id = Uuid::parse_str("121fe402-762a-411a-8eeb-9e6c3ca16886").unwrap();
        repository.create(test_device(id, "my ecc key")).unwrap();

        repository
            .mark_signature_created(id, "bmV3LXNpZ25hdHVyZQ==".to_string())
            .unwrap();

        let device = repository.find(id).unwrap();
        assert_eq!(device.signature_counter, 1);
        assert_eq!(device.last_signature, "bmV3LXNpZ25hdHVyZQ==");
    }

    #[test]
    fn mark_signature_created_fails_for_unknown_id() {
        let mut repository = InMemorySignatureDeviceRepository::new();
        let id = Uuid::nil();

        let err = repository
            .mark_signature_created(id, "some-signature".to_string())
            .unwrap_err();
        assert_eq!(err, RepositoryError::DeviceMissing(id));
    }

    #[test]
    fn list_returns_all_devices() {
        let mut repository = InMemorySignatureDeviceRepository::new();
        let ecc_id = Uuid::parse_str("121fe402-762a-411a-8eeb-9e6c3ca16886").unwrap();
        let rsa_id = Uuid::parse_str("ed40597c-52b7-40bc-9e15-83e4741a102b").unwrap();

        repository.create(test_device(ecc_id, "my ecc key")).unwrap();
        repository
            .create(SignatureDevice::build(rsa_id, &RsaGenerator, Some("my rsa key".to_string())).unwrap())
            .unwrap();

        let devices = repository.list();
        assert_eq!(devices.len(), 2);
        assert!(devices.iter().any(|device| device.id == ecc_id));
        assert!(devices.iter().any(|device| device.id == rsa_id));
    }

    #[test]
    fn transactions_see_each_others_committed_state() {
        let provider = InMemorySignatureDeviceRepositoryProvider::new();
        let id = Uuid::parse_str("121fe402-762a-411a-8eeb-9e6c3ca16886").unwrap();

        provider
            .write_tx(|repository| repository.create(test_device(id, "my ecc key")))
            .unwrap();

        let found = provider
            .read_tx(|repository| Ok::<_, RepositoryError>(repository.find(id)))
            .unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn write_tx_error_propagates() {
        let provider = InMemorySignatureDeviceRepositoryProvider::new();
        let id = Uuid::nil();

        let err = provider
            .write_tx(|repository| repository.mark_signature_created(id, String::new()))
            .unwrap_err();
        assert_eq!(err, RepositoryError::DeviceMissing(id));
    }
}
