use async_trait::async_trait;
use serde_json::Value;

use super::settings::{self, SettingsAction, SettingsBundle};
use super::{Domain, DomainReconciler, Source};
use crate::auth::WriteSession;
use crate::error::SyncResult;

pub const TLS_STATUS: &str = "/control/tls/status";

pub const TLS: SettingsBundle = SettingsBundle::new("encryption", "/control/tls/configure");

pub struct EncryptionSettingsReconciler;

#[async_trait]
impl DomainReconciler for EncryptionSettingsReconciler {
    type State = Value;
    type Action = SettingsAction;

    const DOMAIN: Domain = Domain::EncryptionSettings;

    async fn fetch(&self, source: &Source<'_>) -> SyncResult<Value> {
        source.session.get_value(TLS_STATUS).await
    }

    fn diff(&self, primary: &Value, secondary: &Value) -> Vec<SettingsAction> {
        settings::diff_bundle(TLS, primary, secondary)
            .into_iter()
            .collect()
    }

    async fn apply(&self, target: &WriteSession<'_>, plan: &[SettingsAction]) -> SyncResult<()> {
        settings::apply_all(Self::DOMAIN, target, plan).await
    }
}
