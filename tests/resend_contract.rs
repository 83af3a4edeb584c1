//! HTTP contract tests for the Resend mailer: request format, auth header,
//! and how non-2xx error payloads are surfaced.

use crmd::email::{Mailer, MailerError, OutboundEmail, ResendMailer};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn email() -> OutboundEmail {
    OutboundEmail {
        from: "noreply@atomiccrm.com".to_string(),
        to: "jane@example.com".to_string(),
        subject: "⏰ Task due 2 hours: Follow up".to_string(),
        html: "<p>reminder</p>".to_string(),
    }
}

#[tokio::test]
async fn send_posts_json_payload_with_bearer_credential() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer re_test_key"))
        .and(body_partial_json(json!({
            "from": "noreply@atomiccrm.com",
            "to": "jane@example.com",
            "subject": "⏰ Task due 2 hours: Follow up",
            "html": "<p>reminder</p>"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "email_1" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mailer = ResendMailer::new("re_test_key").with_base_url(mock_server.uri());
    mailer.send(&email()).await.unwrap();
}

#[tokio::test]
async fn non_2xx_surfaces_error_payload_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "statusCode": 422,
            "name": "validation_error",
            "message": "Invalid `to` address"
        })))
        .mount(&mock_server)
        .await;

    let mailer = ResendMailer::new("re_test_key").with_base_url(mock_server.uri());
    let err = mailer.send(&email()).await.unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Resend API error: "), "{}", message);
    assert!(message.contains("validation_error"));
    assert!(message.contains("Invalid `to` address"));
    assert!(matches!(err, MailerError::Api(_)));
}

#[tokio::test]
async fn non_json_error_body_is_passed_through_raw() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let mailer = ResendMailer::new("re_test_key").with_base_url(mock_server.uri());
    let err = mailer.send(&email()).await.unwrap_err();
    assert!(err.to_string().contains("upstream exploded"));
}
