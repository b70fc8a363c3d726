pub mod crypto;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod server;
pub mod service;

pub use error::SignatureServiceError;
pub use server::{router, run, AppState};
pub use service::{SignatureDeviceProjection, SignatureService};
