//! Typed interpretation of the envelope status section.

use std::fmt;

use crate::decode::decode;
use crate::error::{EnvelopeError, EnvelopeResult};
use crate::value::XmlValue;

/// Status code reported inside a response envelope.
///
/// The device reports success as the literal code `200`; any other value is
/// a failure, whatever the transport-level status line said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestStatus {
    /// The envelope reported the literal code `200`
    Ok,
    /// Any other reported code, held verbatim
    Failed(String),
}

impl RestStatus {
    /// Classify a raw code string from the envelope.
    pub fn from_code(code: &str) -> Self {
        if code == "200" {
            RestStatus::Ok
        } else {
            RestStatus::Failed(code.to_string())
        }
    }

    /// True only for the literal `200` code.
    pub fn is_success(&self) -> bool {
        matches!(self, RestStatus::Ok)
    }

    /// The code as the device reported it.
    pub fn code(&self) -> &str {
        match self {
            RestStatus::Ok => "200",
            RestStatus::Failed(code) => code,
        }
    }
}

impl fmt::Display for RestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Status fields extracted from a response envelope.
///
/// # Example
///
/// ```
/// use ribbon_envelope::{EnvelopeStatus, RestStatus};
///
/// let body = r#"
///     <root>
///         <status>
///             <http_code>400</http_code>
///             <app_status>
///                 <app_status_entry code="1020" params=""/>
///             </app_status>
///         </status>
///     </root>"#;
///
/// let status = EnvelopeStatus::from_xml(body).unwrap();
/// assert_eq!(status.code, RestStatus::Failed("400".to_string()));
/// assert_eq!(status.app_error_code.as_deref(), Some("1020"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeStatus {
    /// The status code under `root/status/http_code`
    pub code: RestStatus,
    /// The vendor error code under
    /// `root/status/app_status/app_status_entry/@code`, when present
    pub app_error_code: Option<String>,
}

impl EnvelopeStatus {
    /// Decode `body` and extract its status section.
    ///
    /// The status code element is required and its absence is
    /// [`EnvelopeError::MissingStatusCode`]. The vendor error code is
    /// extracted best-effort: a missing link anywhere along its path leaves
    /// it `None` without failing the extraction.
    pub fn from_xml(body: &str) -> EnvelopeResult<EnvelopeStatus> {
        let document = decode(body)?;
        let status = document.get("root").and_then(|root| root.get("status"));

        let code = status
            .and_then(|status| status.get("http_code"))
            .and_then(XmlValue::as_text)
            .ok_or(EnvelopeError::MissingStatusCode)?;

        let app_error_code = status
            .and_then(|status| status.get("app_status"))
            .and_then(|app| app.get("app_status_entry"))
            .and_then(|entry| entry.get("@code"))
            .and_then(XmlValue::as_text)
            .map(str::to_string);

        Ok(EnvelopeStatus {
            code: RestStatus::from_code(code),
            app_error_code,
        })
    }

    /// True when the envelope reported success.
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}
