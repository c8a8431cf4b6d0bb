//! Shared fixtures for client integration tests

use mockito::ServerGuard;
use ribbon_client::SbcClient;

/// The envelope the device answers with when a call succeeds.
pub fn success_envelope() -> &'static str {
    "<root><status><http_code>200</http_code></status></root>"
}

/// A failure envelope with the given status code and optional vendor code.
pub fn failure_envelope(http_code: &str, app_code: Option<&str>) -> String {
    let app_status = match app_code {
        Some(code) => format!(
            "<app_status><app_status_entry code=\"{}\" params=\"\"/></app_status>",
            code
        ),
        None => String::new(),
    };
    format!(
        "<root><status><http_code>{}</http_code>{}</status></root>",
        http_code, app_status
    )
}

/// A client pointed at the mock server, before any session exists.
pub fn lab_client(server: &ServerGuard) -> SbcClient {
    SbcClient::new("sbc-lab-01", "admin", "secret", false).with_base_url(&server.url())
}

/// Stub a successful login and open a session against the mock server.
pub fn connected_client(server: &mut ServerGuard) -> SbcClient {
    let login = server
        .mock("POST", "/login")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_header("set-cookie", "SBC_SESSION=abc123; Path=/")
        .with_body(success_envelope())
        .create();

    let mut sbc = lab_client(server);
    sbc.open().expect("login against the mock server failed");
    login.assert();
    sbc
}
