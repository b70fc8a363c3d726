use std::sync::Arc;

use pem_rfc7468::LineEnding;
use rand::rngs::OsRng;
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha384};

use super::{CryptoError, KeyPair, KeyPairGenerator};

/// 512-bit RSA is intentionally weak and NOT safe for production use. The
/// modulus is kept this small so key generation stays cheap; raising it also
/// permits hashes larger than SHA-384 (see [`pss_salt_len`]).
pub const RSA_KEY_BITS: usize = 512;

const PUBLIC_KEY_LABEL: &str = "RSA_PUBLIC_KEY";

/// RSASSA-PSS signer over SHA-384.
///
/// SHA-384 is the largest digest that fits a 512-bit modulus: PSS needs
/// `digest + salt + 2` bytes of headroom, which SHA-512 already exceeds.
pub struct RsaKeyPair {
    public: RsaPublicKey,
    private: RsaPrivateKey,
}

/// The maximum PSS salt length the modulus can carry alongside a SHA-384
/// digest. At 512 bits this is 14 bytes. Verifiers must use the same length.
pub fn pss_salt_len(key: &RsaPublicKey) -> usize {
    key.size() - 2 - <Sha384 as Digest>::output_size()
}

impl KeyPair for RsaKeyPair {
    fn algorithm_name(&self) -> &'static str {
        "RSA"
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let digest = Sha384::digest(data);
        let padding = Pss::new_with_salt::<Sha384>(pss_salt_len(&self.public));
        self.private
            .sign_with_rng(&mut OsRng, padding, &digest)
            .map_err(|e| CryptoError::Signing(e.to_string()))
    }

    fn encoded_public_key(&self) -> Result<String, CryptoError> {
        let der = self
            .public
            .to_pkcs1_der()
            .map_err(|e| CryptoError::KeyEncoding(e.to_string()))?;
        pem_rfc7468::encode_string(PUBLIC_KEY_LABEL, LineEnding::LF, der.as_bytes())
            .map_err(|e| CryptoError::KeyEncoding(e.to_string()))
    }
}

/// Generates [`RsaKeyPair`]s.
pub struct RsaGenerator;

impl KeyPairGenerator for RsaGenerator {
    fn algorithm_name(&self) -> &'static str {
        "RSA"
    }

    fn generate(&self) -> Result<Arc<dyn KeyPair>, CryptoError> {
        let private = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        let public = RsaPublicKey::from(&private);
        Ok(Arc::new(RsaKeyPair { public, private }))
    }
}
