//! Mock AdGuard Home appliances for the integration tests.
#![allow(dead_code)]

use std::time::Duration;

use agh_mirror::{ApplianceConfig, DomainToggles, SyncConfig};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// State served by one mock appliance's GET endpoints.
#[derive(Clone)]
pub struct Fixture {
    pub rewrites: Value,
    pub blocked_services: Value,
    pub filtering: Value,
    pub protection_enabled: bool,
    pub safebrowsing: bool,
    pub safesearch: bool,
    pub parental: bool,
    pub querylog: Value,
    pub stats: Value,
    pub dns_info: Value,
    pub access: Value,
    pub tls: Value,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            rewrites: json!([]),
            blocked_services: json!([]),
            filtering: json!({
                "enabled": true,
                "interval": 24,
                "filters": [],
                "whitelist_filters": [],
                "user_rules": [],
            }),
            protection_enabled: true,
            safebrowsing: false,
            safesearch: false,
            parental: false,
            querylog: json!({"enabled": true, "interval": 90, "anonymize_client_ip": false}),
            stats: json!({"interval": 1}),
            dns_info: json!({
                "upstream_dns": ["9.9.9.9"],
                "bootstrap_dns": ["9.9.9.10"],
                "local_ptr_upstreams": [],
                "resolve_clients": true,
                "upstream_mode": "",
                "blocking_ipv4": "",
                "blocking_ipv6": "",
                "blocking_mode": "default",
                "disable_ipv6": false,
                "dnssec_enabled": false,
                "edns_cs_enabled": false,
                "ratelimit": 20,
                "cache_size": 4194304,
                "cache_ttl_max": 0,
                "cache_ttl_min": 0,
            }),
            access: json!({"allowed_clients": [], "disallowed_clients": [], "blocked_hosts": []}),
            tls: json!({"enabled": false, "server_name": "", "force_https": false}),
        }
    }
}

pub fn session_cookie(token: &str) -> String {
    format!("agh_session={token}")
}

/// Start an appliance that hands out `token` on login and accepts every POST.
pub async fn appliance(token: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/control/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("agh_session={token}; Path=/; HttpOnly").as_str())
                .set_body_string("OK"),
        )
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(header("cookie", session_cookie(token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    server
}

pub async fn mount_get(server: &MockServer, token: &str, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("cookie", session_cookie(token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_fixture(server: &MockServer, token: &str, f: &Fixture) {
    let gets = [
        ("/control/rewrite/list", f.rewrites.clone()),
        ("/control/blocked_services/list", f.blocked_services.clone()),
        ("/control/filtering/status", f.filtering.clone()),
        (
            "/control/status",
            json!({"protection_enabled": f.protection_enabled, "running": true}),
        ),
        ("/control/safebrowsing/status", json!({"enabled": f.safebrowsing})),
        ("/control/safesearch/status", json!({"enabled": f.safesearch})),
        ("/control/parental/status", json!({"enabled": f.parental})),
        ("/control/querylog_info", f.querylog.clone()),
        ("/control/stats_info", f.stats.clone()),
        ("/control/dns_info", f.dns_info.clone()),
        ("/control/access/list", f.access.clone()),
        ("/control/tls/status", f.tls.clone()),
    ];
    for (route, body) in gets {
        mount_get(server, token, route, body).await;
    }
}

pub fn sync_config(primary: &MockServer, secondary: &MockServer, domains: DomainToggles) -> SyncConfig {
    SyncConfig {
        primary: ApplianceConfig::new(primary.uri(), "admin", "primary-pass"),
        secondary: ApplianceConfig::new(secondary.uri(), "admin", "secondary-pass"),
        interval: Duration::from_millis(10),
        domains,
    }
}

fn is_write(req: &Request) -> bool {
    req.method.as_str() == "POST" && req.url.path() != "/control/login"
}

/// Every non-login POST the server saw, in arrival order.
pub async fn writes(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(is_write)
        .collect()
}

pub async fn write_paths(server: &MockServer) -> Vec<String> {
    writes(server)
        .await
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

pub fn json_body(req: &Request) -> Value {
    serde_json::from_slice(&req.body).expect("request body is JSON")
}

pub async fn count_path(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == route)
        .count()
}
