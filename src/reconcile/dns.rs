//! Upstream, server and cache settings plus access lists.
use async_trait::async_trait;
use serde_json::Value;

use super::settings::{self, DNS_CONFIG, SettingsAction, SettingsBundle, project};
use super::{Domain, DomainReconciler, Source};
use crate::auth::WriteSession;
use crate::error::SyncResult;

pub const DNS_INFO: &str = "/control/dns_info";
pub const ACCESS_LIST: &str = "/control/access/list";

pub const UPSTREAM: SettingsBundle = SettingsBundle::new("DNS upstream", DNS_CONFIG);
pub const SERVER: SettingsBundle = SettingsBundle::new("DNS server", DNS_CONFIG);
pub const CACHE: SettingsBundle = SettingsBundle::new("DNS cache", DNS_CONFIG);
pub const ACCESS: SettingsBundle = SettingsBundle::new("access", "/control/access/set");

const UPSTREAM_KEYS: &[&str] = &[
    "upstream_dns",
    "bootstrap_dns",
    "local_ptr_upstreams",
    "resolve_clients",
    "upstream_mode",
];

const SERVER_KEYS: &[&str] = &[
    "blocking_ipv4",
    "blocking_ipv6",
    "blocking_mode",
    "disable_ipv6",
    "dnssec_enabled",
    "edns_cs_enabled",
    "ratelimit",
];

const CACHE_KEYS: &[&str] = &["cache_size", "cache_ttl_max", "cache_ttl_min"];

#[derive(Debug, Clone, PartialEq)]
pub struct DnsSettings {
    pub upstream: Value,
    pub server: Value,
    pub cache: Value,
    pub access: Value,
}

impl DnsSettings {
    /// Split a `/control/dns_info` response into its bundles.
    pub fn from_info(info: &Value, access: Value) -> Self {
        Self {
            upstream: project(info, UPSTREAM_KEYS),
            server: project(info, SERVER_KEYS),
            cache: project(info, CACHE_KEYS),
            access,
        }
    }
}

pub struct DnsSettingsReconciler;

#[async_trait]
impl DomainReconciler for DnsSettingsReconciler {
    type State = DnsSettings;
    type Action = SettingsAction;

    const DOMAIN: Domain = Domain::DnsSettings;

    async fn fetch(&self, source: &Source<'_>) -> SyncResult<DnsSettings> {
        let info = source.session.get_value(DNS_INFO).await?;
        let access = source.session.get_value(ACCESS_LIST).await?;
        Ok(DnsSettings::from_info(&info, access))
    }

    fn diff(&self, primary: &DnsSettings, secondary: &DnsSettings) -> Vec<SettingsAction> {
        [
            settings::diff_bundle(UPSTREAM, &primary.upstream, &secondary.upstream),
            settings::diff_bundle(SERVER, &primary.server, &secondary.server),
            settings::diff_bundle(CACHE, &primary.cache, &secondary.cache),
            settings::diff_bundle(ACCESS, &primary.access, &secondary.access),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    async fn apply(&self, target: &WriteSession<'_>, plan: &[SettingsAction]) -> SyncResult<()> {
        settings::apply_all(Self::DOMAIN, target, plan).await
    }
}
