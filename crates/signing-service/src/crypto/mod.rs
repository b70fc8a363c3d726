mod ecdsa;
mod rsa;
mod supported;

pub use self::ecdsa::{EccGenerator, EccKeyPair};
pub use self::rsa::{pss_salt_len, RsaGenerator, RsaKeyPair, RSA_KEY_BITS};
pub use self::supported::{find_key_pair_generator, supported_key_pair_generators};

use std::sync::Arc;

use thiserror::Error;

/// Failures raised by key generation, signing, or key encoding.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("key encoding failed: {0}")]
    KeyEncoding(String),
}

/// An asymmetric key pair owned by a signature device.
///
/// Private material never leaves the implementation; callers only get raw
/// signature bytes and the PEM encoding of the public key.
pub trait KeyPair: Send + Sync {
    /// Algorithm identifier string ("RSA" or "ECC").
    fn algorithm_name(&self) -> &'static str;

    /// Sign the given bytes, returning the raw signature.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// PEM encoding of the public key.
    fn encoded_public_key(&self) -> Result<String, CryptoError>;
}

/// Produces fresh key pairs for one algorithm.
pub trait KeyPairGenerator: Send + Sync {
    /// Algorithm identifier string ("RSA" or "ECC").
    fn algorithm_name(&self) -> &'static str;

    /// Generate a new key pair.
    fn generate(&self) -> Result<Arc<dyn KeyPair>, CryptoError>;
}
