//! Error types for envelope decoding operations

use thiserror::Error;

/// Errors that can occur while decoding a REST response envelope
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// XML parsing failed
    #[error("XML parsing failed: {0}")]
    Parse(String),

    /// The envelope has no status code element
    #[error("envelope is missing the status code element (root/status/http_code)")]
    MissingStatusCode,
}

/// Result type alias for envelope operations
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;
