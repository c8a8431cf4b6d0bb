//! Buffered response snapshots and action outcomes.

use reqwest::blocking::Response;
use reqwest::StatusCode;
use ribbon_envelope::{decode, EnvelopeResult, XmlValue};

/// A response read off the wire, buffered so the envelope check and the
/// caller can both look at the same bytes.
#[derive(Debug, Clone)]
pub struct SbcResponse {
    status: StatusCode,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl SbcResponse {
    /// Drain a transport response into an owned snapshot.
    pub(crate) fn from_http(response: Response) -> reqwest::Result<Self> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes()?.to_vec();

        Ok(SbcResponse {
            status,
            content_type,
            body,
        })
    }

    /// The transport-level status code.
    pub fn http_status(&self) -> StatusCode {
        self.status
    }

    /// The Content-Type header, verbatim, when the device sent one.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as an XML envelope document.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let response = sbc.query("sipservertable", None, None)?;
    /// let document = response.decode()?;
    /// let table = document.get("root").and_then(|root| root.get("sipservertable"));
    /// ```
    pub fn decode(&self) -> EnvelopeResult<XmlValue> {
        decode(&self.text())
    }

    /// Whether the Content-Type advertises a text encoding: an explicit
    /// charset parameter or a `text/*` media type.
    ///
    /// Actions that hand back raw payloads, such as configuration backups,
    /// answer without a text encoding; status envelopes always carry one.
    pub fn has_text_encoding(&self) -> bool {
        match &self.content_type {
            Some(value) => {
                let value = value.to_ascii_lowercase();
                value.contains("charset=") || value.trim_start().starts_with("text/")
            }
            None => false,
        }
    }
}

/// Result of a device action.
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    /// The action ran and the envelope confirmed it
    Confirmed(String),
    /// The action answered with a payload for the caller to interpret
    Response(SbcResponse),
}
