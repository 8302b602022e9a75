//! Blocked services, mirrored as one opaque list.
use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::info;

use super::{Domain, DomainReconciler, Source};
use crate::auth::WriteSession;
use crate::error::SyncResult;

pub const BLOCKED_SERVICES_LIST: &str = "/control/blocked_services/list";
pub const BLOCKED_SERVICES_SET: &str = "/control/blocked_services/set";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockedServicesAction {
    /// Overwrite the secondary's list with this one.
    SetAll(Vec<String>),
}

pub struct BlockedServicesReconciler;

#[async_trait]
impl DomainReconciler for BlockedServicesReconciler {
    type State = Vec<String>;
    type Action = BlockedServicesAction;

    const DOMAIN: Domain = Domain::BlockedServices;

    async fn fetch(&self, source: &Source<'_>) -> SyncResult<Self::State> {
        source.session.get(BLOCKED_SERVICES_LIST).await
    }

    fn diff(&self, primary: &Self::State, secondary: &Self::State) -> Vec<BlockedServicesAction> {
        let p: BTreeSet<&String> = primary.iter().collect();
        let s: BTreeSet<&String> = secondary.iter().collect();

        if p.symmetric_difference(&s).next().is_none() {
            return Vec::new();
        }
        vec![BlockedServicesAction::SetAll(primary.clone())]
    }

    async fn apply(
        &self,
        target: &WriteSession<'_>,
        plan: &[BlockedServicesAction],
    ) -> SyncResult<()> {
        for action in plan {
            let BlockedServicesAction::SetAll(services) = action;
            info!(domain = %Self::DOMAIN, action = "set", count = services.len(), after = ?services, "replacing blocked services");
            target.post(BLOCKED_SERVICES_SET, services).await?;
        }
        Ok(())
    }
}
