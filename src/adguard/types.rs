use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "agh_session";

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub name: &'a str,
    pub password: &'a str,
}

/// One DNS rewrite; identity is the whole (domain, answer) pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RewriteEntry {
    pub domain: String, // "nas.lan"
    pub answer: String, // "192.168.1.10" or a CNAME target
}

impl RewriteEntry {
    pub fn new(domain: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            answer: answer.into(),
        }
    }
}

/// A block- or allow-list subscription. `id` is local to one appliance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterList {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub url: String,
    pub enabled: bool,
}

/// Response of `/control/filtering/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct FilteringStatus {
    pub enabled: bool,
    #[serde(default)]
    pub interval: Value, // hours between list refreshes
    #[serde(default)]
    pub filters: Option<Vec<FilterList>>,
    #[serde(default)]
    pub whitelist_filters: Option<Vec<FilterList>>,
    #[serde(default)]
    pub user_rules: Option<Vec<String>>,
}

impl FilteringStatus {
    /// Custom rules, with `null` read as no rules.
    pub fn rules(&self) -> &[String] {
        self.user_rules.as_deref().unwrap_or_default()
    }
}

/// The subset of `/control/status` we mirror.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtectionStatus {
    pub protection_enabled: bool,
}

/// Shape shared by the safebrowsing/safesearch/parental status endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureStatus {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ProtectionToggle {
    pub protection_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct FilterUrlRemove<'a> {
    pub url: &'a str,
    pub whitelist: bool,
}

#[derive(Debug, Serialize)]
pub struct FilterUrlAdd<'a> {
    pub name: &'a str,
    pub url: &'a str,
    pub whitelist: bool,
}

#[derive(Debug, Serialize)]
pub struct FilterUrlData<'a> {
    pub name: &'a str,
    pub url: &'a str,
    pub enabled: bool,
}

// Used when modifying an existing list in place
#[derive(Debug, Serialize)]
pub struct FilterUrlSet<'a> {
    pub url: &'a str,
    pub data: FilterUrlData<'a>,
    pub whitelist: bool,
}
