mod device;
mod sign;

pub use device::{
    BuildSignatureDeviceError, RepositoryError, SignatureDevice, SignatureDeviceRepository,
    SignatureDeviceRepositoryProvider,
};
pub use sign::{sign_transaction, SignTransactionError, SignedTransaction};
