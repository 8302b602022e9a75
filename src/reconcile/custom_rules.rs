//! User-written filtering rules, compared as one newline-joined text.
use async_trait::async_trait;
use tracing::info;

use super::{Domain, DomainReconciler, Source};
use crate::auth::WriteSession;
use crate::error::SyncResult;

pub const FILTERING_SET_RULES: &str = "/control/filtering/set_rules";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomRulesAction {
    /// Upload this text as the complete rule set.
    ReplaceAll(String),
}

pub struct CustomRulesReconciler;

#[async_trait]
impl DomainReconciler for CustomRulesReconciler {
    type State = String;
    type Action = CustomRulesAction;

    const DOMAIN: Domain = Domain::CustomRules;

    async fn fetch(&self, source: &Source<'_>) -> SyncResult<String> {
        let status = source.filtering_status().await?;
        Ok(status.rules().join("\n"))
    }

    fn diff(&self, primary: &String, secondary: &String) -> Vec<CustomRulesAction> {
        if primary == secondary {
            return Vec::new();
        }
        vec![CustomRulesAction::ReplaceAll(primary.clone())]
    }

    async fn apply(&self, target: &WriteSession<'_>, plan: &[CustomRulesAction]) -> SyncResult<()> {
        for action in plan {
            let CustomRulesAction::ReplaceAll(rules) = action;
            info!(domain = %Self::DOMAIN, action = "replace", lines = rules.lines().count(), "uploading custom rules");
            target.post_text(FILTERING_SET_RULES, rules).await?;
        }
        Ok(())
    }
}
