//! Integration tests for the SBC client against a mock REST endpoint
//!
//! These tests drive full request/response cycles through mockito to pin
//! down the wire shapes: form-encoded credentials, cookie handling, the
//! envelope status gate, and the three action request modes.

mod helpers;

use helpers::{connected_client, failure_envelope, lab_client, success_envelope};
use mockito::{Matcher, Server};
use ribbon_client::{ActionOutcome, ClientError, FileUpload, RestStatus};
use rstest::rstest;

/// Login posts the credentials as a form and reports the host on success
#[test]
fn test_open_posts_credentials_and_names_the_host() {
    let mut server = Server::new();
    let login = server
        .mock("POST", "/login")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("Username".into(), "admin".into()),
            Matcher::UrlEncoded("Password".into(), "secret".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(success_envelope())
        .create();

    let mut sbc = lab_client(&server);
    let message = sbc.open().expect("login should succeed");

    assert!(message.contains("sbc-lab-01"));
    assert!(sbc.is_open());
    login.assert();
}

/// A failure envelope on login surfaces both codes and releases the context
#[test]
fn test_open_failure_reports_codes_and_releases() {
    let mut server = Server::new();
    server
        .mock("POST", "/login")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(failure_envelope("401", Some("20001")))
        .create();

    let mut sbc = lab_client(&server);
    let error = sbc.open().expect_err("login should fail");

    match error {
        ClientError::Api {
            status,
            app_error_code,
        } => {
            assert_eq!(status, RestStatus::Failed("401".to_string()));
            assert_eq!(app_error_code.as_deref(), Some("20001"));
        }
        other => panic!("expected an API error, got {:?}", other),
    }
    assert!(!sbc.is_open());
}

/// The login cookie rides along on subsequent calls
#[test]
fn test_session_cookie_is_replayed_after_login() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    let query = server
        .mock("GET", "/sipservertable")
        .match_header("cookie", Matcher::Regex("SBC_SESSION=abc123".to_string()))
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(success_envelope())
        .create();

    sbc.query("sipservertable", None, None)
        .expect("query should succeed");
    query.assert();
}

/// Calls on a client that never logged in carry no cookie
#[test]
fn test_calls_before_open_carry_no_cookie() {
    let mut server = Server::new();
    let query = server
        .mock("GET", "/sipservertable")
        .match_header("cookie", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(success_envelope())
        .create();

    let mut sbc = lab_client(&server);
    sbc.query("sipservertable", None, None)
        .expect("the device decides whether an anonymous call passes");
    query.assert();
}

/// Both query parameters reach the wire in the documented order
#[test]
fn test_query_sends_details_and_filter_parameters() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    let query = server
        .mock("GET", "/sipservertable?details=true&filter=Description:eq:trunk")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(success_envelope())
        .create();

    sbc.query("sipservertable", Some("true"), Some("Description:eq:trunk"))
        .expect("query should succeed");
    query.assert();
}

/// A failure envelope on a query surfaces both codes and releases the context
#[test]
fn test_query_failure_envelope_is_an_api_error() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    server
        .mock("GET", "/sipservertable")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(failure_envelope("400", Some("1020")))
        .create();

    let error = sbc
        .query("sipservertable", None, None)
        .expect_err("the envelope reported a failure");

    match error {
        ClientError::Api {
            status,
            app_error_code,
        } => {
            assert_eq!(status.code(), "400");
            assert_eq!(app_error_code.as_deref(), Some("1020"));
        }
        other => panic!("expected an API error, got {:?}", other),
    }
    assert!(!sbc.is_open());
}

/// Transport-level failures propagate and keep the context alive
#[test]
fn test_transport_errors_propagate_unmodified() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    server
        .mock("GET", "/sipservertable")
        .with_status(500)
        .create();

    let error = sbc
        .query("sipservertable", None, None)
        .expect_err("the transport reported a failure");

    assert!(matches!(error, ClientError::Transport(_)));
    assert!(sbc.is_open());
}

/// Create uses PUT with form-encoded fields
#[test]
fn test_create_puts_form_fields() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    let create = server
        .mock("PUT", "/sipservertable/5")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("Server".into(), "10.0.0.5".into()),
            Matcher::UrlEncoded("Port".into(), "5060".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(success_envelope())
        .create();

    let response = sbc
        .create("sipservertable/5", &[("Server", "10.0.0.5"), ("Port", "5060")])
        .expect("create should succeed");

    assert!(response.text().contains("http_code"));
    create.assert();
}

/// Update uses POST with form-encoded fields
#[test]
fn test_update_posts_form_fields() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    let update = server
        .mock("POST", "/sipservertable/5")
        .match_body(Matcher::UrlEncoded("Priority".into(), "2".into()))
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(success_envelope())
        .create();

    sbc.update("sipservertable/5", &[("Priority", "2")])
        .expect("update should succeed");
    update.assert();
}

/// Delete confirms with the full resource URL
#[test]
fn test_delete_confirms_with_the_resource_url() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    let delete = server
        .mock("DELETE", "/sipservertable/9")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(success_envelope())
        .create();

    let message = sbc.delete("sipservertable/9").expect("delete should succeed");

    assert!(message.contains("/sipservertable/9"));
    delete.assert();
}

/// An action without data or file is a bare POST with an envelope check
#[test]
fn test_plain_action_confirms_the_action_name() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    let action = server
        .mock("POST", "/ntp?action=restart")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(success_envelope())
        .create();

    let outcome = sbc
        .action("ntp", "restart", None, None)
        .expect("action should succeed");

    match outcome {
        ActionOutcome::Confirmed(message) => assert!(message.contains("restart")),
        other => panic!("expected a confirmation, got {:?}", other),
    }
    action.assert();
}

/// A file-bearing action posts multipart data under the Filename field
#[test]
fn test_upload_action_sends_the_file_as_multipart() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    let upload = server
        .mock("POST", "/backuprestore?action=restore")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="Filename"; filename="config\.tar\.gz""#.to_string()),
            Matcher::Regex("dummy configuration archive".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(success_envelope())
        .create();

    let file = FileUpload::new("config.tar.gz", b"dummy configuration archive".to_vec());
    let outcome = sbc
        .action("backuprestore", "restore", None, Some(file))
        .expect("upload should succeed");

    match outcome {
        ActionOutcome::Confirmed(message) => assert!(message.contains("config.tar.gz")),
        other => panic!("expected a confirmation, got {:?}", other),
    }
    upload.assert();
}

/// Data fields accompanying an upload ride along as multipart text parts
#[test]
fn test_upload_action_sends_data_fields_as_text_parts() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    let upload = server
        .mock("POST", "/backuprestore?action=restore")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="Mode"\s+full"#.to_string()),
            Matcher::Regex(r#"name="Filename"; filename="config\.tar\.gz""#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(success_envelope())
        .create();

    let file = FileUpload::new("config.tar.gz", b"dummy configuration archive".to_vec());
    let data = [("Mode", "full")];
    let outcome = sbc
        .action("backuprestore", "restore", Some(&data[..]), Some(file))
        .expect("upload should succeed");

    assert!(matches!(outcome, ActionOutcome::Confirmed(_)));
    upload.assert();
}

/// Data-mode requests that answer without a text encoding return the payload
#[rstest]
#[case("backup", None)]
#[case("export", Some(&[("Target", "config")][..]))]
fn test_data_mode_returns_unchecked_payloads(
    #[case] action: &str,
    #[case] data: Option<&[(&str, &str)]>,
) {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    let path = format!("/system?action={}", action);
    let mock = server
        .mock("POST", path.as_str())
        .with_status(200)
        .with_header("content-type", "application/octet-stream")
        .with_body(b"\x1f\x8b backup payload".as_slice())
        .create();

    let outcome = sbc
        .action("system", action, data, None)
        .expect("the payload answer is not an error");

    match outcome {
        ActionOutcome::Response(response) => {
            assert_eq!(response.body(), b"\x1f\x8b backup payload");
            assert!(!response.has_text_encoding());
        }
        other => panic!("expected a payload response, got {:?}", other),
    }
    assert!(sbc.is_open());
    mock.assert();
}

/// A success envelope where a payload was expected is returned, not raised
#[test]
fn test_data_mode_unexpected_success_envelope_is_returned() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    server
        .mock("POST", "/system?action=backup")
        .with_status(200)
        .with_header("content-type", "text/xml; charset=utf-8")
        .with_body(success_envelope())
        .create();

    let outcome = sbc
        .action("system", "backup", None, None)
        .expect("an unexpected success envelope is still a response");

    assert!(matches!(outcome, ActionOutcome::Response(_)));
    assert!(sbc.is_open());
}

/// A failure envelope in data mode is an API error like anywhere else
#[test]
fn test_data_mode_failure_envelope_is_an_api_error() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    server
        .mock("POST", "/system?action=backup")
        .with_status(200)
        .with_header("content-type", "text/xml; charset=utf-8")
        .with_body(failure_envelope("500", None))
        .create();

    let error = sbc
        .action("system", "backup", None, None)
        .expect_err("the envelope reported a failure");

    assert!(matches!(error, ClientError::Api { .. }));
    assert!(!sbc.is_open());
}

/// Close tears the context down and names the host
#[test]
fn test_close_confirms_and_releases() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    let logout = server
        .mock("POST", "/logout")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(success_envelope())
        .create();

    let message = sbc.close().expect("logout should succeed");

    assert!(message.contains("sbc-lab-01"));
    assert!(!sbc.is_open());
    logout.assert();
}

/// Close releases the context even when logout reports a failure
#[test]
fn test_close_releases_even_when_logout_fails() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    server
        .mock("POST", "/logout")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(failure_envelope("403", None))
        .create();

    let error = sbc.close().expect_err("logout reported a failure");

    assert!(matches!(error, ClientError::Api { .. }));
    assert!(!sbc.is_open());
}

/// Close releases the context even when the logout body cannot be decoded
#[test]
fn test_close_releases_even_on_garbled_logout_answers() {
    let mut server = Server::new();
    let mut sbc = connected_client(&mut server);

    server
        .mock("POST", "/logout")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>gateway timeout")
        .create();

    let error = sbc.close().expect_err("the logout answer was not an envelope");

    assert!(matches!(error, ClientError::Envelope(_)));
    assert!(!sbc.is_open());
}
