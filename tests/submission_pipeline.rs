//! End-to-end tests for the consultation submission pipeline.

use consultation_server::config::ServerConfig;
use reqwest::StatusCode;

mod common;

use common::{api_url, client, spawn_server, valid_payload, RecordingTransport};

#[tokio::test]
async fn relays_a_valid_submission() {
    let transport = RecordingTransport::new();
    let (addr, shutdown) = spawn_server(ServerConfig::default(), transport.clone()).await;

    let res = client()
        .post(api_url(addr))
        .json(&valid_payload())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["ok"], true);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].name, "Ada Lovelace");
    assert_eq!(sent[0].email, "ada@example.com");
    assert_eq!(sent[0].phone, "+974 5512 3456");
    assert_eq!(sent[0].business_name, "");

    shutdown.trigger();
}

#[tokio::test]
async fn accepts_form_encoded_bodies() {
    let transport = RecordingTransport::new();
    let (addr, shutdown) = spawn_server(ServerConfig::default(), transport.clone()).await;

    let res = client()
        .post(api_url(addr))
        .form(&[
            ("name", "Ada Lovelace"),
            ("email", "ada@example.com"),
            ("phone", "+974 5512 3456"),
            ("businessName", "Analytical Engines"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].business_name, "Analytical Engines");

    shutdown.trigger();
}

#[tokio::test]
async fn identical_submissions_are_relayed_twice() {
    // no deduplication by content
    let transport = RecordingTransport::new();
    let (addr, shutdown) = spawn_server(ServerConfig::default(), transport.clone()).await;
    let client = client();

    for _ in 0..2 {
        let res = client
            .post(api_url(addr))
            .json(&valid_payload())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
    assert_eq!(transport.sent().len(), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn sixth_submission_in_the_window_is_limited() {
    let transport = RecordingTransport::new();
    let (addr, shutdown) = spawn_server(ServerConfig::default(), transport.clone()).await;
    let client = client();

    for _ in 0..5 {
        let res = client
            .post(api_url(addr))
            .json(&valid_payload())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client
        .post(api_url(addr))
        .json(&valid_payload())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key("retry-after"));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert!(body["message"].as_str().unwrap().contains("try again"));

    // the first five were dispatched, the sixth never reached the transport
    assert_eq!(transport.sent().len(), 5);

    shutdown.trigger();
}

#[tokio::test]
async fn distinct_clients_have_independent_quotas() {
    let transport = RecordingTransport::new();
    let (addr, shutdown) = spawn_server(ServerConfig::default(), transport.clone()).await;
    let client = client();

    for i in 0..6 {
        let res = client
            .post(api_url(addr))
            .header("x-forwarded-for", format!("203.0.113.{i}"))
            .json(&valid_payload())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
    assert_eq!(transport.sent().len(), 6);

    shutdown.trigger();
}

#[tokio::test]
async fn invalid_payloads_never_reach_the_transport() {
    let transport = RecordingTransport::new();
    let (addr, shutdown) = spawn_server(ServerConfig::default(), transport.clone()).await;
    let client = client();

    let cases = [
        (
            serde_json::json!({"email": "ada@example.com", "phone": "+974 5512 3456"}),
            "name",
        ),
        (
            serde_json::json!({"name": "Ada", "email": "not-an-email", "phone": "+974 5512 3456"}),
            "email",
        ),
        (
            serde_json::json!({"name": "Ada", "email": "ada@example.com", "phone": "call me"}),
            "phone",
        ),
    ];

    for (payload, field) in cases {
        let res = client
            .post(api_url(addr))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["ok"], false);
        assert!(
            body["message"].as_str().unwrap().contains(field),
            "message should name the {field} field: {body}"
        );
    }

    assert!(transport.sent().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn malformed_bodies_are_a_bad_request() {
    let transport = RecordingTransport::new();
    let (addr, shutdown) = spawn_server(ServerConfig::default(), transport.clone()).await;

    let res = client()
        .post(api_url(addr))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert!(transport.sent().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn non_post_methods_are_rejected() {
    let transport = RecordingTransport::new();
    let (addr, shutdown) = spawn_server(ServerConfig::default(), transport.clone()).await;

    let res = client().get(api_url(addr)).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["ok"], false);

    shutdown.trigger();
}

#[tokio::test]
async fn preflight_is_answered_before_the_pipeline() {
    let transport = RecordingTransport::new();
    let (addr, shutdown) = spawn_server(ServerConfig::default(), transport.clone()).await;

    let res = client()
        .request(reqwest::Method::OPTIONS, api_url(addr))
        .header("origin", "https://example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(res.status().is_success());
    assert!(res.headers().contains_key("access-control-allow-origin"));
    assert!(transport.sent().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn health_reports_mail_credential_presence() {
    let transport = RecordingTransport::new();
    let (addr, shutdown) = spawn_server(ServerConfig::default(), transport.clone()).await;

    let res = client()
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["mail_configured"], false);
    shutdown.trigger();

    let mut config = ServerConfig::default();
    config.mail.username = Some("sender@example.com".to_string());
    config.mail.password = Some("abcdabcdabcdabcd".to_string());
    config.mail.recipient = "inbox@example.com".to_string();
    let (addr, shutdown) = spawn_server(config, RecordingTransport::new()).await;

    let res = client()
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["mail_configured"], true);
    shutdown.trigger();
}
