//! Transport helper and settings primitive against a single mock appliance.

mod common;

use agh_mirror::ErrorClass;
use agh_mirror::adguard::client::ApplianceClient;
use agh_mirror::auth::{SessionToken, WriteSession};
use agh_mirror::reconcile::Domain;
use agh_mirror::reconcile::settings::{SettingsBundle, update_if_different};
use common::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATS: SettingsBundle = SettingsBundle::new("stats", "/control/stats_config");

#[tokio::test]
async fn login_returns_session_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/control/login"))
        .and(body_json(json!({"name": "admin", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "agh_session=abc123; Path=/; HttpOnly"),
        )
        .mount(&server)
        .await;

    let client = ApplianceClient::new(server.uri());
    let token = client.login("admin", "pw").await.unwrap();
    assert_eq!(token.as_str(), "abc123");
}

#[tokio::test]
async fn login_without_cookie_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/control/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = ApplianceClient::new(server.uri())
        .login("admin", "pw")
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Login);
}

#[tokio::test]
async fn unreachable_appliance_is_a_login_failure() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let err = ApplianceClient::new(uri).login("admin", "pw").await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Login);
}

#[tokio::test]
async fn status_codes_are_classified() {
    let server = MockServer::start().await;
    let token = SessionToken::new("t");
    Mock::given(method("GET"))
        .and(path("/control/status"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/control/dns_info"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/control/tls/status"))
        .and(header("cookie", "agh_session=t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"enabled": false})))
        .mount(&server)
        .await;

    let client = ApplianceClient::new(format!("{}/", server.uri()));

    let err = client.get_value("/control/status", &token).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Auth);

    let err = client.get_value("/control/dns_info", &token).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Request);

    let ok = client.get_value("/control/tls/status", &token).await.unwrap();
    assert_eq!(ok, json!({"enabled": false}));
}

#[tokio::test]
async fn undecodable_body_is_a_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/control/rewrite/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = ApplianceClient::new(server.uri())
        .get_value("/control/rewrite/list", &SessionToken::new("t"))
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Request);
}

#[tokio::test]
async fn differing_bundle_is_posted_once() {
    let server = appliance("t").await;
    let client = ApplianceClient::new(server.uri());
    let token = SessionToken::new("t");
    let target = WriteSession::new(&client, &token);

    let wrote = update_if_different(
        Domain::GeneralSettings,
        &target,
        STATS,
        &json!({"a": 1, "b": 2}),
        &json!({"a": 1, "b": 3}),
    )
    .await
    .unwrap();
    assert!(wrote);

    let sent = writes(&server).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url.path(), "/control/stats_config");
    assert_eq!(json_body(&sent[0]), json!({"a": 1, "b": 2}));
}

#[tokio::test]
async fn equal_bundle_is_not_posted() {
    let server = appliance("t").await;
    let client = ApplianceClient::new(server.uri());
    let token = SessionToken::new("t");
    let target = WriteSession::new(&client, &token);

    let value: Value = json!({"a": 1, "b": 2});
    let wrote = update_if_different(Domain::GeneralSettings, &target, STATS, &value, &value)
        .await
        .unwrap();
    assert!(!wrote);
    assert!(writes(&server).await.is_empty());
}

#[tokio::test]
async fn rejected_write_surfaces_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/control/stats_config"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let client = ApplianceClient::new(server.uri());
    let token = SessionToken::new("t");
    let target = WriteSession::new(&client, &token);

    let err = update_if_different(
        Domain::GeneralSettings,
        &target,
        STATS,
        &json!({"interval": 7}),
        &json!({"interval": 1}),
    )
    .await
    .unwrap_err();
    assert!(err.is_auth());
}
