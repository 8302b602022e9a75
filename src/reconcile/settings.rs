//! Wholesale-replace primitive shared by the settings reconcilers.
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::Domain;
use crate::adguard::types::ProtectionToggle;
use crate::auth::WriteSession;
use crate::error::SyncResult;

pub const DNS_CONFIG: &str = "/control/dns_config";

/// A settings object and the endpoint that accepts it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsBundle {
    pub name: &'static str,
    pub target: &'static str,
}

impl SettingsBundle {
    pub const fn new(name: &'static str, target: &'static str) -> Self {
        Self { name, target }
    }
}

/// On/off switches that have their own endpoints instead of a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Protection,
    SafeBrowsing,
    SafeSearch,
    Parental,
}

impl Feature {
    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Protection => "protection",
            Feature::SafeBrowsing => "safebrowsing",
            Feature::SafeSearch => "safesearch",
            Feature::Parental => "parental",
        }
    }

    pub fn status_path(self) -> &'static str {
        match self {
            Feature::Protection => "/control/status",
            Feature::SafeBrowsing => "/control/safebrowsing/status",
            Feature::SafeSearch => "/control/safesearch/status",
            Feature::Parental => "/control/parental/status",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    Toggle { feature: Feature, enabled: bool },
    Replace { bundle: SettingsBundle, value: Value },
}

/// `Replace` with the primary's value when the two differ structurally.
pub fn diff_bundle(
    bundle: SettingsBundle,
    primary: &Value,
    secondary: &Value,
) -> Option<SettingsAction> {
    (primary != secondary).then(|| SettingsAction::Replace {
        bundle,
        value: primary.clone(),
    })
}

pub fn diff_toggle(feature: Feature, primary: bool, secondary: bool) -> Option<SettingsAction> {
    (primary != secondary).then_some(SettingsAction::Toggle {
        feature,
        enabled: primary,
    })
}

/// Copy `keys` out of a JSON object; keys the object lacks are left out.
pub fn project(source: &Value, keys: &[&str]) -> Value {
    let mut out = Map::new();
    for key in keys {
        if let Some(v) = source.get(*key) {
            out.insert((*key).to_string(), v.clone());
        }
    }
    Value::Object(out)
}

pub async fn apply_action(
    domain: Domain,
    target: &WriteSession<'_>,
    action: &SettingsAction,
) -> SyncResult<()> {
    match action {
        SettingsAction::Toggle {
            feature: Feature::Protection,
            enabled,
        } => {
            info!(%domain, action = "toggle", key = "protection", after = enabled, "switching global protection");
            let body = ProtectionToggle {
                protection_enabled: *enabled,
            };
            target.post(DNS_CONFIG, &body).await
        }
        SettingsAction::Toggle { feature, enabled } => {
            info!(%domain, action = "toggle", key = feature.as_str(), after = enabled, "switching feature");
            let verb = if *enabled { "enable" } else { "disable" };
            let path = format!("/control/{}/{}", feature.as_str(), verb);
            target.post_empty(&path).await
        }
        SettingsAction::Replace { bundle, value } => {
            info!(%domain, action = "replace", key = bundle.name, path = bundle.target, "updating settings");
            debug!(%domain, key = bundle.name, after = %value, "settings payload");
            target.post(bundle.target, value).await
        }
    }
}

pub async fn apply_all(
    domain: Domain,
    target: &WriteSession<'_>,
    plan: &[SettingsAction],
) -> SyncResult<()> {
    for action in plan {
        apply_action(domain, target, action).await?;
    }
    Ok(())
}

/// Push `primary` to `bundle.target` if it differs. Returns whether a write happened.
///
/// The settings reconcilers plan with [`diff_bundle`] and apply with [`apply_all`]
/// so a whole domain is diffed before anything is written; this is the same pair
/// for a single bundle.
pub async fn update_if_different(
    domain: Domain,
    target: &WriteSession<'_>,
    bundle: SettingsBundle,
    primary: &Value,
    secondary: &Value,
) -> SyncResult<bool> {
    match diff_bundle(bundle, primary, secondary) {
        Some(action) => {
            apply_action(domain, target, &action).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}
