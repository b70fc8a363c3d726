use std::sync::Arc;

use p384::ecdsa::signature::hazmat::PrehashSigner;
use p384::ecdsa::{Signature, SigningKey};
use p384::pkcs8::EncodePublicKey;
use pem_rfc7468::LineEnding;
use rand::rngs::OsRng;
use sha2::{Digest, Sha384};

use super::{CryptoError, KeyPair, KeyPairGenerator};

const PUBLIC_KEY_LABEL: &str = "PUBLIC_KEY";

/// ECDSA signer over the NIST P-384 curve.
///
/// Input is hashed with SHA-384 (matching the curve's field size) and
/// signatures are emitted in ASN.1 DER form.
pub struct EccKeyPair {
    signing_key: SigningKey,
}

impl KeyPair for EccKeyPair {
    fn algorithm_name(&self) -> &'static str {
        "ECC"
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let digest = Sha384::digest(data);
        let signature: Signature = self
            .signing_key
            .sign_prehash(&digest)
            .map_err(|e| CryptoError::Signing(e.to_string()))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn encoded_public_key(&self) -> Result<String, CryptoError> {
        let der = self
            .signing_key
            .verifying_key()
            .to_public_key_der()
            .map_err(|e| CryptoError::KeyEncoding(e.to_string()))?;
        pem_rfc7468::encode_string(PUBLIC_KEY_LABEL, LineEnding::LF, der.as_bytes())
            .map_err(|e| CryptoError::KeyEncoding(e.to_string()))
    }
}

/// Generates [`EccKeyPair`]s.
pub struct EccGenerator;

impl KeyPairGenerator for EccGenerator {
    fn algorithm_name(&self) -> &'static str {
        "ECC"
    }

    fn generate(&self) -> Result<Arc<dyn KeyPair>, CryptoError> {
        let signing_key = SigningKey::random(&mut OsRng);
        Ok(Arc::new(EccKeyPair { signing_key }))
    }
}
