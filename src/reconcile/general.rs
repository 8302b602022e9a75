//! Protection switches plus filtering, query log and statistics settings.
use async_trait::async_trait;
use serde_json::{Value, json};

use super::settings::{self, Feature, SettingsAction, SettingsBundle};
use super::{Domain, DomainReconciler, Source};
use crate::adguard::types::{FeatureStatus, ProtectionStatus};
use crate::auth::WriteSession;
use crate::error::SyncResult;

pub const QUERYLOG_INFO: &str = "/control/querylog_info";
pub const STATS_INFO: &str = "/control/stats_info";

pub const FILTERING: SettingsBundle = SettingsBundle::new("filtering", "/control/filtering/config");
pub const QUERYLOG: SettingsBundle = SettingsBundle::new("querylog", "/control/querylog_config");
pub const STATS: SettingsBundle = SettingsBundle::new("stats", "/control/stats_config");

#[derive(Debug, Clone, PartialEq)]
pub struct GeneralSettings {
    pub protection_enabled: bool,
    pub safebrowsing: bool,
    pub safesearch: bool,
    pub parental: bool,
    /// `{enabled, interval}` from the filtering status.
    pub filtering: Value,
    pub querylog: Value,
    pub stats: Value,
}

pub struct GeneralSettingsReconciler;

async fn feature_enabled(source: &Source<'_>, feature: Feature) -> SyncResult<bool> {
    let status: FeatureStatus = source.session.get(feature.status_path()).await?;
    Ok(status.enabled)
}

#[async_trait]
impl DomainReconciler for GeneralSettingsReconciler {
    type State = GeneralSettings;
    type Action = SettingsAction;

    const DOMAIN: Domain = Domain::GeneralSettings;

    async fn fetch(&self, source: &Source<'_>) -> SyncResult<GeneralSettings> {
        let protection: ProtectionStatus =
            source.session.get(Feature::Protection.status_path()).await?;
        let safebrowsing = feature_enabled(source, Feature::SafeBrowsing).await?;
        let safesearch = feature_enabled(source, Feature::SafeSearch).await?;
        let parental = feature_enabled(source, Feature::Parental).await?;
        let querylog = source.session.get_value(QUERYLOG_INFO).await?;
        let stats = source.session.get_value(STATS_INFO).await?;

        let filtering_status = source.filtering_status().await?;
        let filtering = json!({
            "enabled": filtering_status.enabled,
            "interval": filtering_status.interval,
        });

        Ok(GeneralSettings {
            protection_enabled: protection.protection_enabled,
            safebrowsing,
            safesearch,
            parental,
            filtering,
            querylog,
            stats,
        })
    }

    fn diff(&self, primary: &GeneralSettings, secondary: &GeneralSettings) -> Vec<SettingsAction> {
        [
            settings::diff_toggle(
                Feature::Protection,
                primary.protection_enabled,
                secondary.protection_enabled,
            ),
            settings::diff_toggle(Feature::SafeSearch, primary.safesearch, secondary.safesearch),
            settings::diff_toggle(
                Feature::SafeBrowsing,
                primary.safebrowsing,
                secondary.safebrowsing,
            ),
            settings::diff_toggle(Feature::Parental, primary.parental, secondary.parental),
            settings::diff_bundle(FILTERING, &primary.filtering, &secondary.filtering),
            settings::diff_bundle(QUERYLOG, &primary.querylog, &secondary.querylog),
            settings::diff_bundle(STATS, &primary.stats, &secondary.stats),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    async fn apply(&self, target: &WriteSession<'_>, plan: &[SettingsAction]) -> SyncResult<()> {
        settings::apply_all(Self::DOMAIN, target, plan).await
    }
}
