//! # ribbon-client
//!
//! Synchronous client for the Ribbon SBC Edge REST management API.
//!
//! A session logs in once with form credentials, rides the resulting cookie
//! through CRUD calls and device actions against
//! `https://{host}/rest/{resource}`, and interprets the XML status envelope
//! every response is wrapped in. Success means the envelope reports the
//! literal code `200`; the HTTP status line alone proves nothing.
//!
//! ## Usage
//!
//! ```no_run
//! use ribbon_client::SbcClient;
//!
//! let mut sbc = SbcClient::new("sbc.example.net", "admin", "secret", false);
//! sbc.open()?;
//!
//! // Walk a table with details, then update one row
//! let response = sbc.query("sipservertable", Some("true"), None)?;
//! println!("{:?}", response.decode()?);
//! sbc.update("sipservertable/1", &[("Priority", "2")])?;
//!
//! sbc.close()?;
//! # Ok::<(), ribbon_client::ClientError>(())
//! ```

pub mod client;
pub mod error;
pub mod logging;
pub mod response;

// Re-export the client surface for convenient top-level access
pub use client::{FileUpload, SbcClient};
pub use error::{ClientError, Result, APP_ERROR_DOCS};
pub use response::{ActionOutcome, SbcResponse};

// Re-export the envelope types callers meet in this crate's API
pub use ribbon_envelope::{decode, EnvelopeError, EnvelopeStatus, RestStatus, XmlValue};
