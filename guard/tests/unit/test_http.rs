//! Health probe and webhook tests against a mock HTTP server

use std::sync::Arc;
use std::time::Duration;

use deployguard::config::settings::Settings;
use deployguard::health::{HealthProbe, HttpHealthProbe};
use deployguard::notify::{Notifier, NotifyLevel, SlackChannel};
use deployguard::rollback::RollbackManager;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn probe(endpoint: String) -> HttpHealthProbe {
    HttpHealthProbe::new(Some(endpoint), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_health_check_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(probe(format!("{}/health", server.uri())).check().await);
}

#[tokio::test]
async fn test_health_check_non_200_is_unhealthy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(!probe(format!("{}/health", server.uri())).check().await);
    assert!(!probe(format!("{}/down", server.uri())).check().await);
}

#[tokio::test]
async fn test_health_check_unreachable_is_unhealthy() {
    let server = MockServer::start().await;
    let endpoint = format!("{}/health", server.uri());
    drop(server);

    assert!(!probe(endpoint).check().await);
}

#[tokio::test]
async fn test_health_check_timeout_is_unhealthy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let probe = HttpHealthProbe::new(
        Some(format!("{}/health", server.uri())),
        Duration::from_millis(200),
    )
    .unwrap();
    assert!(!probe.check().await);
}

#[tokio::test]
async fn test_health_check_sentinel_is_skipped() {
    let probe = HttpHealthProbe::from_settings(&Settings::default()).unwrap();
    assert!(probe.endpoint().is_none());
    assert!(probe.check().await);

    let settings = Settings {
        health_check_endpoint: String::new(),
        ..Default::default()
    };
    assert!(HttpHealthProbe::from_settings(&settings).unwrap().check().await);
}

#[tokio::test]
async fn test_slack_payload_is_posted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(serde_json::json!({
            "text": "❌ Rollback failed: boom",
            "color": "danger"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let channel = SlackChannel::new(format!("{}/hook", server.uri())).unwrap();
    let notifier = Notifier::new(Arc::new(channel));

    notifier.notify("❌ Rollback failed: boom", NotifyLevel::Error).await;
}

#[tokio::test]
async fn test_webhook_failure_does_not_propagate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let settings = Settings {
        slack_webhook: Some(format!("{}/hook", server.uri())),
        ..Default::default()
    };
    let manager = RollbackManager::from_settings(&settings).unwrap();

    manager.notify_team("🔄 Rollback completed successfully", NotifyLevel::Info).await;
}

#[tokio::test]
async fn test_no_webhook_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let manager = RollbackManager::from_settings(&Settings::default()).unwrap();

    manager.notify_team("hello", NotifyLevel::Info).await;
    manager.notify_team("oops", NotifyLevel::Error).await;
}
