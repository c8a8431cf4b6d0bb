//! Error types for SBC REST operations

use ribbon_envelope::{EnvelopeError, EnvelopeStatus, RestStatus};
use thiserror::Error;

/// Vendor documentation for application error codes.
pub const APP_ERROR_DOCS: &str =
    "https://support.sonus.net/display/UXAPIDOC/Application+Error+Codes";

/// Errors that can occur while talking to the SBC REST API
#[derive(Error, Debug)]
pub enum ClientError {
    /// The HTTP round-trip failed, or the device answered with a
    /// transport-level error status
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be interpreted as a status envelope
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    /// The device answered, but its envelope reported a failure code
    #[error(
        "REST API error: status code {status}, application error code {}; see {}",
        app_code_label(.app_error_code),
        APP_ERROR_DOCS
    )]
    Api {
        /// The status code the envelope reported
        status: RestStatus,
        /// The vendor error code, when the envelope carried one
        app_error_code: Option<String>,
    },
}

impl ClientError {
    /// Build an API error from an extracted envelope status.
    pub(crate) fn api(status: EnvelopeStatus) -> Self {
        ClientError::Api {
            status: status.code,
            app_error_code: status.app_error_code,
        }
    }
}

fn app_code_label(code: &Option<String>) -> &str {
    code.as_deref().unwrap_or("none")
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
