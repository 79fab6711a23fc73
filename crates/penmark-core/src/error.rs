//! Proofing error types.
//!
//! Defined in `penmark-core` so the assessor can tell configuration mistakes
//! apart from transient upstream failures without string matching.

use thiserror::Error;

/// Errors that can occur when talking to a proofing service.
#[derive(Debug, Error)]
pub enum ProofError {
    /// The configured endpoint is not a usable http(s) URL.
    #[error("invalid proofing endpoint: {0}")]
    InvalidEndpoint(String),

    /// The requested language code is not one the service accepts.
    #[error("unsupported language code: {0}")]
    UnsupportedLanguage(String),

    /// The service answered with a non-success status.
    #[error("proofing service error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("malformed proofing response: {0}")]
    MalformedResponse(String),
}

impl ProofError {
    /// Returns `true` for mistakes in configuration, which fail fast.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProofError::InvalidEndpoint(_) | ProofError::UnsupportedLanguage(_)
        )
    }
}
