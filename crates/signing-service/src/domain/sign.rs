use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::crypto::CryptoError;

use super::device::{RepositoryError, SignatureDeviceRepository, SignatureDeviceRepositoryProvider};

/// A signature issued by a device, plus the exact payload that was signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub signature: String,
    pub signed_data: String,
}

#[derive(Debug, Error)]
pub enum SignTransactionError {
    #[error("failed to sign transaction: {0}")]
    Signing(#[from] CryptoError),
    #[error("failed to update signature device: {0}")]
    Repository(#[from] RepositoryError),
}

/// Issue the device's next chained signature over `data`.
///
/// The whole read-sign-mark sequence runs inside a single write transaction,
/// so concurrent calls against the same device are assigned consecutive
/// counter values. The counter only advances in `mark_signature_created`,
/// after signing succeeded; on any error the transaction aborts with the
/// device untouched.
///
/// Returns `None` when no device with `device_id` exists.
pub fn sign_transaction<P>(
    provider: &P,
    device_id: Uuid,
    data: &str,
) -> Result<Option<SignedTransaction>, SignTransactionError>
where
    P: SignatureDeviceRepositoryProvider,
{
    provider.write_tx(|repository| {
        let Some(device) = repository.find(device_id) else {
            return Ok(None);
        };

        let signed_data = device.secure_payload(data);
        let raw_signature = device.key_pair.sign(signed_data.as_bytes())?;
        let signature = STANDARD.encode(raw_signature);

        repository.mark_signature_created(device_id, signature.clone())?;

        Ok(Some(SignedTransaction {
            signature,
            signed_data,
        }))
    })
}
