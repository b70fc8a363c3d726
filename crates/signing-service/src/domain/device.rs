use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;
use uuid::Uuid;

use crate::crypto::{CryptoError, KeyPair, KeyPairGenerator};

/// A named holder of an asymmetric key pair plus chained-signature state.
///
/// `signature_counter` and `last_signature` move in lockstep: the counter is
/// 0 exactly while `last_signature` is empty, and both are only ever advanced
/// together by [`SignatureDeviceRepository::mark_signature_created`].
#[derive(Clone)]
pub struct SignatureDevice {
    pub id: Uuid,
    pub key_pair: Arc<dyn KeyPair>,
    pub label: String,
    pub signature_counter: u64,
    pub last_signature: String,
}

#[derive(Debug, Error)]
#[error("private key generation failed: {0}")]
pub struct BuildSignatureDeviceError(#[from] pub CryptoError);

impl SignatureDevice {
    /// Build a fresh device: generates a key pair and starts the chain at
    /// counter 0 with an empty last-signature.
    pub fn build(
        id: Uuid,
        generator: &dyn KeyPairGenerator,
        label: Option<String>,
    ) -> Result<Self, BuildSignatureDeviceError> {
        let key_pair = generator.generate()?;

        Ok(Self {
            id,
            key_pair,
            label: label.unwrap_or_default(),
            signature_counter: 0,
            last_signature: String::new(),
        })
    }

    /// The deterministic payload that is actually signed:
    /// `"<counter>_<data>_<ref>"`.
    ///
    /// While the device is unused the `lastSignature` is blank, so the
    /// base64 of the device id stands in as the chain anchor. Afterwards the
    /// stored last-signature is used verbatim: it is already base64 and must
    /// not be encoded a second time.
    pub fn secure_payload(&self, data: &str) -> String {
        let reference = if self.signature_counter == 0 {
            STANDARD.encode(self.id.to_string())
        } else {
            self.last_signature.clone()
        };

        format!("{}_{}_{}", self.signature_counter, data, reference)
    }
}

impl fmt::Debug for SignatureDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureDevice")
            .field("id", &self.id)
            .field("algorithm", &self.key_pair.algorithm_name())
            .field("label", &self.label)
            .field("signature_counter", &self.signature_counter)
            .field("last_signature", &self.last_signature)
            .finish()
    }
}

/// Failures raised by a repository backend.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("duplicate id: {0}")]
    DuplicateId(Uuid),
    #[error("cannot update signature device that does not exist: {0}")]
    DeviceMissing(Uuid),
}

/// Storage contract for signature devices. Only ever used inside a
/// transaction obtained from a [`SignatureDeviceRepositoryProvider`].
pub trait SignatureDeviceRepository {
    /// Insert a new device; fails if the id is already present.
    fn create(&mut self, device: SignatureDevice) -> Result<(), RepositoryError>;

    /// Fetch a device by id. Absence is not an error.
    fn find(&self, id: Uuid) -> Option<SignatureDevice>;

    /// Snapshot of all devices. Order is unspecified; callers that need a
    /// deterministic order sort by id.
    fn list(&self) -> Vec<SignatureDevice>;

    /// Atomically advance the counter by one and overwrite the
    /// last-signature.
    fn mark_signature_created(&mut self, id: Uuid, signature: String)
        -> Result<(), RepositoryError>;
}

/// Hands out transactional access to a repository.
///
/// `write_tx` holds the exclusive lock for the whole closure so multi-step
/// mutations (find + sign + mark) appear atomic to other transactions;
/// `read_tx` holds the shared lock. A durable backend would implement these
/// as database transactions without the signing code changing.
///
/// Transactions must not be nested on the same provider, and a `read_tx`
/// closure must not call mutating repository methods.
pub trait SignatureDeviceRepositoryProvider {
    type Repository: SignatureDeviceRepository;

    fn write_tx<T, E>(&self, tx: impl FnOnce(&mut Self::Repository) -> Result<T, E>)
        -> Result<T, E>;

    fn read_tx<T, E>(&self, tx: impl FnOnce(&Self::Repository) -> Result<T, E>) -> Result<T, E>;
}
