//! One reconciler per configuration domain, all driven through [`DomainReconciler`].

pub mod blocked_services;
pub mod custom_rules;
pub mod dns;
pub mod encryption;
pub mod entries;
pub mod filter_lists;
pub mod general;
pub mod settings;

use std::borrow::Cow;
use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use crate::adguard::types::FilteringStatus;
use crate::auth::{Session, WriteSession};
use crate::error::SyncResult;

pub const FILTERING_STATUS: &str = "/control/filtering/status";

/// Configuration domains, in the order a pass visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Entries,
    BlockedServices,
    FilterLists,
    CustomRules,
    GeneralSettings,
    DnsSettings,
    EncryptionSettings,
}

impl Domain {
    pub const ALL: [Domain; 7] = [
        Domain::Entries,
        Domain::BlockedServices,
        Domain::FilterLists,
        Domain::CustomRules,
        Domain::GeneralSettings,
        Domain::DnsSettings,
        Domain::EncryptionSettings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Entries => "entries",
            Domain::BlockedServices => "blocked-services",
            Domain::FilterLists => "filter-lists",
            Domain::CustomRules => "custom-rules",
            Domain::GeneralSettings => "general-settings",
            Domain::DnsSettings => "dns-settings",
            Domain::EncryptionSettings => "encryption-settings",
        }
    }

    /// Domains whose state comes out of `/control/filtering/status`.
    pub fn uses_filtering_status(&self) -> bool {
        matches!(
            self,
            Domain::FilterLists | Domain::CustomRules | Domain::GeneralSettings
        )
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filtering status of both sides, fetched once per pass.
#[derive(Debug, Clone, Default)]
pub struct PassShared {
    pub primary: Option<FilteringStatus>,
    pub secondary: Option<FilteringStatus>,
}

impl PassShared {
    pub async fn fetch(primary: &Session<'_>, secondary: &Session<'_>) -> SyncResult<Self> {
        let primary = primary.get(FILTERING_STATUS).await?;
        let secondary = secondary.get(FILTERING_STATUS).await?;
        Ok(Self {
            primary: Some(primary),
            secondary: Some(secondary),
        })
    }
}

/// One side of a pass as seen by a reconciler's `fetch`.
#[derive(Clone, Copy)]
pub struct Source<'a> {
    pub session: Session<'a>,
    filtering: Option<&'a FilteringStatus>,
}

impl<'a> Source<'a> {
    pub fn new(session: Session<'a>, filtering: Option<&'a FilteringStatus>) -> Self {
        Self { session, filtering }
    }

    /// The pass-wide filtering status, or a fresh GET when it was not prefetched.
    pub async fn filtering_status(&self) -> SyncResult<Cow<'a, FilteringStatus>> {
        match self.filtering {
            Some(status) => Ok(Cow::Borrowed(status)),
            None => Ok(Cow::Owned(self.session.get(FILTERING_STATUS).await?)),
        }
    }
}

#[async_trait]
pub trait DomainReconciler: Send + Sync {
    type State: Send + Sync;
    type Action: fmt::Debug + Send + Sync;

    const DOMAIN: Domain;

    async fn fetch(&self, source: &Source<'_>) -> SyncResult<Self::State>;

    /// Pure: the corrective actions, already in the order they must be applied.
    fn diff(&self, primary: &Self::State, secondary: &Self::State) -> Vec<Self::Action>;

    async fn apply(&self, target: &WriteSession<'_>, plan: &[Self::Action]) -> SyncResult<()>;
}

/// Fetch both sides, diff, and apply. Returns the number of planned actions.
pub async fn run<R: DomainReconciler>(
    reconciler: &R,
    primary: &Source<'_>,
    secondary: &Source<'_>,
    target: &WriteSession<'_>,
) -> SyncResult<usize> {
    let primary_state = reconciler.fetch(primary).await?;
    let secondary_state = reconciler.fetch(secondary).await?;

    let plan = reconciler.diff(&primary_state, &secondary_state);
    if plan.is_empty() {
        debug!(domain = %R::DOMAIN, "in sync");
        return Ok(0);
    }

    debug!(domain = %R::DOMAIN, actions = plan.len(), ?plan, "applying plan");
    reconciler.apply(target, &plan).await?;
    Ok(plan.len())
}

/// Dispatch a single domain to its reconciler.
pub async fn run_domain(
    domain: Domain,
    primary: &Source<'_>,
    secondary: &Source<'_>,
    target: &WriteSession<'_>,
) -> SyncResult<usize> {
    match domain {
        Domain::Entries => run(&entries::EntriesReconciler, primary, secondary, target).await,
        Domain::BlockedServices => {
            run(
                &blocked_services::BlockedServicesReconciler,
                primary,
                secondary,
                target,
            )
            .await
        }
        Domain::FilterLists => {
            run(&filter_lists::FilterListsReconciler, primary, secondary, target).await
        }
        Domain::CustomRules => {
            run(&custom_rules::CustomRulesReconciler, primary, secondary, target).await
        }
        Domain::GeneralSettings => {
            run(&general::GeneralSettingsReconciler, primary, secondary, target).await
        }
        Domain::DnsSettings => run(&dns::DnsSettingsReconciler, primary, secondary, target).await,
        Domain::EncryptionSettings => {
            run(
                &encryption::EncryptionSettingsReconciler,
                primary,
                secondary,
                target,
            )
            .await
        }
    }
}
