//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to the HTTP status codes returned to callers:
/// - [`ServiceError::BadCiphertext`] → 400
/// - [`ServiceError::InvalidTopology`] → 400
/// - [`ServiceError::Backend`] → 502
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The transport-encoded ciphertext in the inbound request is malformed.
    #[error("malformed auction request ciphertext: {0}")]
    BadCiphertext(String),

    /// The auction topology is structurally invalid — empty buyer list or an
    /// unrecognised client type.
    #[error("invalid auction topology: {0}")]
    InvalidTopology(String),

    /// The remote SelectAd call failed: transport error, timeout, or an
    /// explicit backend error status.
    #[error("auction backend failure: {0}")]
    Backend(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadCiphertext(_) => 400,
            ServiceError::InvalidTopology(_) => 400,
            ServiceError::Backend(_) => 502,
        }
    }

    /// Short machine-readable code for the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadCiphertext(_) => "bad_ciphertext",
            ServiceError::InvalidTopology(_) => "invalid_topology",
            ServiceError::Backend(_) => "backend_failure",
        }
    }

    /// Message safe to expose to callers.
    ///
    /// Request-shape errors carry their detail; backend failures are reduced
    /// to a generic indicator so internal causes stay in the logs only.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::BadCiphertext(_) | ServiceError::InvalidTopology(_) => self.to_string(),
            ServiceError::Backend(_) => "ad auction backend call failed".to_owned(),
        }
    }
}
