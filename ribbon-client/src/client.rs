//! The SBC session client and its resource operations.

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use ribbon_envelope::EnvelopeStatus;
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::response::{ActionOutcome, SbcResponse};

/// A file attached to a file-bearing action, sent as the `Filename`
/// multipart field the device expects.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Name reported to the device for the uploaded file
    pub filename: String,
    /// Raw file content
    pub content: Vec<u8>,
}

impl FileUpload {
    pub fn new(filename: &str, content: Vec<u8>) -> Self {
        FileUpload {
            filename: filename.to_string(),
            content,
        }
    }
}

/// A client for one authenticated session against an SBC's REST API.
///
/// The client logs in with form credentials, carries the session cookie
/// across calls, and interprets the XML status envelope every response is
/// wrapped in: a call only succeeded when the envelope reports the literal
/// code `200`, whatever the HTTP status line said.
///
/// The underlying HTTP context is built lazily on first use and dropped
/// again by [`close`](SbcClient::close) or by any call the device answers
/// with a failure envelope, so a failed session never lingers.
///
/// # Example
///
/// ```no_run
/// use ribbon_client::SbcClient;
///
/// let mut sbc = SbcClient::new("sbc.example.net", "admin", "secret", false);
/// println!("{}", sbc.open()?);
///
/// let response = sbc.query("sipservertable", None, None)?;
/// println!("{}", response.text());
///
/// println!("{}", sbc.close()?);
/// # Ok::<(), ribbon_client::ClientError>(())
/// ```
pub struct SbcClient {
    host: String,
    username: String,
    password: String,
    base_url: String,
    verify_tls: bool,
    http: Option<Client>,
}

impl SbcClient {
    /// Create a client for `https://{host}/rest`.
    ///
    /// No connection is made until the first call. Most SBC deployments run
    /// self-signed certificates, so `verify_tls` is typically `false`;
    /// passing `true` enforces normal certificate validation.
    pub fn new(host: &str, username: &str, password: &str, verify_tls: bool) -> Self {
        let base_url = format!("https://{}/rest", host);
        SbcClient {
            host: host.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            base_url,
            verify_tls,
            http: None,
        }
    }

    /// Replace the derived base URL (for non-standard deployments).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Whether a connection context currently exists.
    pub fn is_open(&self) -> bool {
        self.http.is_some()
    }

    /// Log in and establish the session.
    ///
    /// Posts the credentials as a form to `{base}/login`. The device answers
    /// with a status envelope; anything but the literal code `200` is an API
    /// error, even when the HTTP status was fine.
    ///
    /// # Returns
    ///
    /// A confirmation message naming the host, or an error describing what
    /// the device reported.
    pub fn open(&mut self) -> Result<String> {
        let url = format!("{}/login", self.base_url);
        debug!("POST {}", url);

        let form = [
            ("Username", self.username.clone()),
            ("Password", self.password.clone()),
        ];
        let client = self.http()?;
        let response = read_checked(client.post(&url).form(&form).send()?)?;
        self.expect_success(&response)?;

        info!("Session to {} established", self.host);
        Ok(format!("Successfully connected to {}.", self.host))
    }

    /// Log out and drop the connection context.
    ///
    /// The context is released whatever the outcome, so a client is always
    /// closed after this call even when the logout itself failed.
    pub fn close(&mut self) -> Result<String> {
        let outcome = self.send_logout();
        self.release();
        outcome?;

        info!("Session to {} closed", self.host);
        Ok(format!("Successfully closed connection to {}.", self.host))
    }

    /// Read a resource.
    ///
    /// # Arguments
    ///
    /// * `resource` - Resource path below the REST root, such as
    ///   `sipservertable` or `sipservertable/1`
    /// * `details` - Optional value for the `details` query parameter
    /// * `filters` - Optional value for the `filter` query parameter
    ///
    /// # Returns
    ///
    /// The buffered response once its envelope confirmed success; decode it
    /// with [`SbcResponse::decode`] to walk the resource data.
    pub fn query(
        &mut self,
        resource: &str,
        details: Option<&str>,
        filters: Option<&str>,
    ) -> Result<SbcResponse> {
        let url = self.query_url(resource, details, filters);
        debug!("GET {}", url);

        let client = self.http()?;
        let response = read_checked(client.get(&url).send()?)?;
        self.expect_success(&response)?;
        Ok(response)
    }

    /// Create a resource from form fields (PUT).
    pub fn create(&mut self, resource: &str, data: &[(&str, &str)]) -> Result<SbcResponse> {
        let url = self.resource_url(resource);
        debug!("PUT {}", url);

        let client = self.http()?;
        let response = read_checked(client.put(&url).form(data).send()?)?;
        self.expect_success(&response)?;
        Ok(response)
    }

    /// Update a resource from form fields (POST).
    pub fn update(&mut self, resource: &str, data: &[(&str, &str)]) -> Result<SbcResponse> {
        let url = self.resource_url(resource);
        debug!("POST {}", url);

        let client = self.http()?;
        let response = read_checked(client.post(&url).form(data).send()?)?;
        self.expect_success(&response)?;
        Ok(response)
    }

    /// Delete a resource.
    pub fn delete(&mut self, resource: &str) -> Result<String> {
        let url = self.resource_url(resource);
        debug!("DELETE {}", url);

        let client = self.http()?;
        let response = read_checked(client.delete(&url).send()?)?;
        self.expect_success(&response)?;
        Ok(format!("Success deleting {}.", url))
    }

    /// Run a device action against `{base}/{resource}?action={action}`.
    ///
    /// Three request shapes, picked from the arguments:
    ///
    /// * With `file`: a multipart upload carrying any `data` fields plus the
    ///   file, confirmed through the usual envelope check.
    /// * With `data`, or for `backup` without data: a form POST whose answer
    ///   may be a raw payload instead of an envelope. Payload responses come
    ///   back unchecked as [`ActionOutcome::Response`]; an enveloped answer
    ///   is checked and a failure raised as usual.
    /// * Otherwise: a bare POST confirmed through the envelope check.
    pub fn action(
        &mut self,
        resource: &str,
        action: &str,
        data: Option<&[(&str, &str)]>,
        file: Option<FileUpload>,
    ) -> Result<ActionOutcome> {
        let url = format!("{}/{}?action={}", self.base_url, resource, action);

        if let Some(file) = file {
            return self.action_upload(&url, data, file);
        }
        // A bare backup still expects a payload answer, not a confirmation
        if data.is_some() || action == "backup" {
            return self.action_with_data(&url, action, data);
        }
        self.action_plain(&url, action)
    }

    fn action_upload(
        &mut self,
        url: &str,
        data: Option<&[(&str, &str)]>,
        file: FileUpload,
    ) -> Result<ActionOutcome> {
        debug!("POST {} (upload: {})", url, file.filename);

        let mut form = Form::new();
        for (name, value) in data.unwrap_or(&[]) {
            form = form.text(name.to_string(), value.to_string());
        }
        let filename = file.filename.clone();
        form = form.part("Filename", Part::bytes(file.content).file_name(file.filename));

        let client = self.http()?;
        let response = read_checked(client.post(url).multipart(form).send()?)?;
        self.expect_success(&response)?;
        Ok(ActionOutcome::Confirmed(format!(
            "Success uploading file {} to {}.",
            filename, url
        )))
    }

    fn action_with_data(
        &mut self,
        url: &str,
        action: &str,
        data: Option<&[(&str, &str)]>,
    ) -> Result<ActionOutcome> {
        debug!("POST {} (data mode)", url);

        let client = self.http()?;
        let request = match data {
            Some(fields) => client.post(url).form(fields),
            None => client.post(url),
        };
        let response = read_checked(request.send()?)?;

        // Payload answers (config backups and the like) carry no text
        // encoding and no envelope to check
        if !response.has_text_encoding() {
            debug!(
                "Action {:?} answered with an unchecked payload ({} bytes)",
                action,
                response.body().len()
            );
            return Ok(ActionOutcome::Response(response));
        }

        let status = EnvelopeStatus::from_xml(&response.text())?;
        if status.is_success() {
            // Enveloped answers here normally report failures; a success
            // envelope in place of a payload is unexpected but not an error
            warn!("Unexpected success envelope for action {:?} at {}", action, url);
            return Ok(ActionOutcome::Response(response));
        }
        Err(self.api_failure(status))
    }

    fn action_plain(&mut self, url: &str, action: &str) -> Result<ActionOutcome> {
        debug!("POST {}", url);

        let client = self.http()?;
        let response = read_checked(client.post(url).send()?)?;
        self.expect_success(&response)?;
        Ok(ActionOutcome::Confirmed(format!(
            "Success performing action {:?} at {}.",
            action, url
        )))
    }

    fn send_logout(&mut self) -> Result<()> {
        let url = format!("{}/logout", self.base_url);
        debug!("POST {}", url);

        let client = self.http()?;
        let response = read_checked(client.post(&url).send()?)?;
        let status = EnvelopeStatus::from_xml(&response.text())?;
        if status.is_success() {
            Ok(())
        } else {
            warn!(
                "Logout from {} failed (status: {}, app code: {:?})",
                self.host, status.code, status.app_error_code
            );
            Err(ClientError::api(status))
        }
    }

    /// The connection context, built on first use. Clones are cheap and
    /// share the cookie store.
    fn http(&mut self) -> Result<Client> {
        match self.http {
            Some(ref client) => Ok(client.clone()),
            None => {
                debug!(
                    "Building HTTP context for {} (verify_tls: {})",
                    self.host, self.verify_tls
                );
                let client = Client::builder()
                    .cookie_store(true)
                    .danger_accept_invalid_certs(!self.verify_tls)
                    .build()?;
                self.http = Some(client.clone());
                Ok(client)
            }
        }
    }

    /// Interpret a response's envelope, releasing the connection context
    /// when the device reported a failure.
    fn expect_success(&mut self, response: &SbcResponse) -> Result<EnvelopeStatus> {
        let status = EnvelopeStatus::from_xml(&response.text())?;
        if status.is_success() {
            Ok(status)
        } else {
            Err(self.api_failure(status))
        }
    }

    fn api_failure(&mut self, status: EnvelopeStatus) -> ClientError {
        warn!(
            "API failure from {} (status: {}, app code: {:?})",
            self.host, status.code, status.app_error_code
        );
        self.release();
        ClientError::api(status)
    }

    fn release(&mut self) {
        if self.http.take().is_some() {
            debug!("Released HTTP context for {}", self.host);
        }
    }

    fn resource_url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    fn query_url(&self, resource: &str, details: Option<&str>, filters: Option<&str>) -> String {
        match (details, filters) {
            (Some(details), Some(filters)) => format!(
                "{}/{}?details={}&filter={}",
                self.base_url, resource, details, filters
            ),
            (Some(details), None) => {
                format!("{}/{}?details={}", self.base_url, resource, details)
            }
            (None, Some(filters)) => {
                format!("{}/{}?filter={}", self.base_url, resource, filters)
            }
            (None, None) => format!("{}/{}", self.base_url, resource),
        }
    }
}

/// Enforce a transport-level success status, then buffer the body.
fn read_checked(response: Response) -> Result<SbcResponse> {
    Ok(SbcResponse::from_http(response.error_for_status()?)?)
}
