//! Gate behavior against a live (mocked) status endpoint: happy path,
//! malformed payloads, and the fail-soft default.

use crmd::gate::{BootstrapGate, SIGN_IN_PATH, SIGN_UP_PATH, StatusProbe, resolve};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn gate_for(body: serde_json::Value) -> (MockServer, BootstrapGate) {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bootstrap-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;
    let gate = BootstrapGate::new(format!("{}/bootstrap-status", mock_server.uri()));
    (mock_server, gate)
}

#[tokio::test]
async fn setup_required_redirects_to_sign_up() {
    let (_server, gate) = gate_for(json!({ "setupRequired": true })).await;
    assert_eq!(gate.entry_route("/").await, Some(SIGN_UP_PATH));
    assert_eq!(gate.entry_route(SIGN_UP_PATH).await, None);
}

#[tokio::test]
async fn steady_state_redirects_to_sign_in() {
    let (_server, gate) = gate_for(json!({ "setupRequired": false })).await;
    assert_eq!(gate.entry_route("/contacts/7").await, Some(SIGN_IN_PATH));
    assert_eq!(gate.entry_route(SIGN_IN_PATH).await, None);
}

#[tokio::test]
async fn missing_field_reads_as_steady_state() {
    let (_server, gate) = gate_for(json!({ "error": "listUsers failed" })).await;
    let status = resolve(gate.probe().await);
    assert!(!status.setup_required);
}

#[tokio::test]
async fn non_boolean_field_reads_as_steady_state() {
    let (_server, gate) = gate_for(json!({ "setupRequired": "yes" })).await;
    let status = resolve(gate.probe().await);
    assert!(!status.setup_required);
}

#[tokio::test]
async fn unreachable_endpoint_resolves_without_error() {
    // Nothing listens on port 1; the probe must come back Unreachable and
    // the fallback rule must settle on steady-state.
    let gate = BootstrapGate::new("http://127.0.0.1:1/bootstrap-status");
    let probe = gate.probe().await;
    assert!(matches!(probe, StatusProbe::Unreachable(_)));
    assert!(!resolve(probe).setup_required);
    assert_eq!(gate.entry_route("/").await, Some(SIGN_IN_PATH));
}

#[tokio::test]
async fn non_json_response_reads_as_steady_state() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bootstrap-status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&mock_server)
        .await;

    let gate = BootstrapGate::new(format!("{}/bootstrap-status", mock_server.uri()));
    assert!(!resolve(gate.probe().await).setup_required);
}
