//! # ribbon-envelope
//!
//! Decoding of Ribbon SBC Edge REST response envelopes.
//!
//! Every call against the SBC REST API answers with an XML body shaped as
//! `<root><status><http_code>…</http_code>…</status>…</root>`, and the call
//! only succeeded when that envelope reports the literal code `200`,
//! regardless of the HTTP status line. This crate decodes response bodies
//! into a generic [`XmlValue`] mapping and interprets the status section.
//!
//! ## Usage
//!
//! ```rust
//! use ribbon_envelope::{decode, EnvelopeStatus};
//!
//! let body = "<root><status><http_code>200</http_code></status></root>";
//!
//! let status = EnvelopeStatus::from_xml(body).unwrap();
//! assert!(status.is_success());
//!
//! let document = decode(body).unwrap();
//! assert!(document.get("root").is_some());
//! ```

pub mod decode;
pub mod error;
pub mod status;
pub mod value;

// Re-export the decoding entry points for convenient top-level access
pub use decode::{decode, escape_bare_ampersands};

// Re-export error types for convenient top-level access
pub use error::{EnvelopeError, EnvelopeResult};

// Re-export the status types for convenient top-level access
pub use status::{EnvelopeStatus, RestStatus};

// Re-export the document mapping for convenient top-level access
pub use value::{XmlValue, TEXT_KEY};
