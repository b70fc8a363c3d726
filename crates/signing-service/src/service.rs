use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto;
use crate::domain::{
    self, SignatureDevice, SignatureDeviceRepository, SignatureDeviceRepositoryProvider,
    SignedTransaction,
};
use crate::error::SignatureServiceError;

/// The external view of a device. Keys appear only in their PEM encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureDeviceProjection {
    pub id: String,
    pub label: String,
    pub public_key: String,
    pub algorithm: String,
    pub signature_counter: u64,
    pub last_signature: String,
}

/// The façade the HTTP layer calls into. Translates repository and crypto
/// outcomes into the service error taxonomy.
pub struct SignatureService<P> {
    provider: P,
}

impl<P> SignatureService<P>
where
    P: SignatureDeviceRepositoryProvider,
{
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn create_device(
        &self,
        id: &str,
        algorithm: &str,
        label: Option<String>,
    ) -> Result<SignatureDeviceProjection, SignatureServiceError> {
        let id = parse_device_id(id)?;

        self.provider.write_tx(|repository| {
            if repository.find(id).is_some() {
                return Err(SignatureServiceError::DuplicateId);
            }

            let generator = crypto::find_key_pair_generator(algorithm)
                .ok_or(SignatureServiceError::UnsupportedAlgorithm)?;

            let device = SignatureDevice::build(id, generator, label)
                .map_err(|err| SignatureServiceError::Internal(err.into()))?;
            let projection = project(&device)?;

            repository
                .create(device)
                .map_err(|err| SignatureServiceError::Internal(err.into()))?;

            tracing::info!(device_id = %id, algorithm, "created signature device");
            Ok(projection)
        })
    }

    pub fn sign_transaction(
        &self,
        device_id: &str,
        data: &str,
    ) -> Result<SignedTransaction, SignatureServiceError> {
        let id = parse_device_id(device_id)?;

        match domain::sign_transaction(&self.provider, id, data) {
            Ok(Some(signed)) => Ok(signed),
            Ok(None) => Err(SignatureServiceError::DeviceNotFound),
            Err(err) => Err(SignatureServiceError::Internal(err.into())),
        }
    }

    pub fn find_device(
        &self,
        device_id: &str,
    ) -> Result<SignatureDeviceProjection, SignatureServiceError> {
        let id = parse_device_id(device_id)?;

        self.provider.read_tx(|repository| {
            let device = repository
                .find(id)
                .ok_or(SignatureServiceError::DeviceNotFound)?;
            project(&device)
        })
    }

    /// List every device, sorted by canonical UUID string ascending. The
    /// repository snapshot is unordered; ordering is this façade's contract.
    pub fn list_devices(&self) -> Result<Vec<SignatureDeviceProjection>, SignatureServiceError> {
        let mut projections = self
            .provider
            .read_tx(|repository| repository.list().iter().map(project).collect::<Result<Vec<_>, _>>())?;

        projections.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(projections)
    }
}

fn parse_device_id(id: &str) -> Result<Uuid, SignatureServiceError> {
    Uuid::parse_str(id).map_err(|_| SignatureServiceError::InvalidId)
}

fn project(device: &SignatureDevice) -> Result<SignatureDeviceProjection, SignatureServiceError> {
    let public_key = device
        .key_pair
        .encoded_public_key()
        .map_err(|err| SignatureServiceError::Internal(err.into()))?;

    Ok(SignatureDeviceProjection {
        id: device.id.to_string(),
        label: device.label.clone(),
        public_key,
        algorithm: device.key_pair.algorithm_name().to_string(),
        signature_counter: device.signature_counter,
        last_signature: device.last_signature.clone(),
    })
}
