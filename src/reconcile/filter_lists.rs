//! Block- and allow-list subscriptions, matched across appliances by URL.
use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::info;

use super::{Domain, DomainReconciler, Source};
use crate::adguard::types::{
    FilterList, FilterUrlAdd, FilterUrlData, FilterUrlRemove, FilterUrlSet, FilteringStatus,
};
use crate::auth::WriteSession;
use crate::error::SyncResult;

pub const FILTERING_ADD_URL: &str = "/control/filtering/add_url";
pub const FILTERING_REMOVE_URL: &str = "/control/filtering/remove_url";
pub const FILTERING_SET_URL: &str = "/control/filtering/set_url";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Block,
    Allow,
}

impl ListKind {
    /// Value of the `whitelist` flag on the wire.
    pub fn is_allow(self) -> bool {
        self == ListKind::Allow
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListKind::Block => "blocklist",
            ListKind::Allow => "allowlist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterListAction {
    Remove {
        kind: ListKind,
        url: String,
    },
    Add {
        kind: ListKind,
        name: String,
        url: String,
    },
    Modify {
        kind: ListKind,
        name: String,
        url: String,
        enabled: bool,
    },
}

/// Lists of one appliance keyed by URL. Ids are dropped here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterLists {
    pub blocklists: BTreeMap<String, ListSettings>,
    pub allowlists: BTreeMap<String, ListSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSettings {
    pub name: String,
    pub enabled: bool,
}

impl FilterLists {
    pub fn from_status(status: &FilteringStatus) -> Self {
        Self {
            blocklists: by_url(status.filters.as_deref()),
            allowlists: by_url(status.whitelist_filters.as_deref()),
        }
    }

    fn of(&self, kind: ListKind) -> &BTreeMap<String, ListSettings> {
        match kind {
            ListKind::Block => &self.blocklists,
            ListKind::Allow => &self.allowlists,
        }
    }
}

fn by_url(lists: Option<&[FilterList]>) -> BTreeMap<String, ListSettings> {
    lists
        .unwrap_or_default()
        .iter()
        .map(|l| {
            (
                l.url.clone(),
                ListSettings {
                    name: l.name.clone(),
                    enabled: l.enabled,
                },
            )
        })
        .collect()
}

pub struct FilterListsReconciler;

#[async_trait]
impl DomainReconciler for FilterListsReconciler {
    type State = FilterLists;
    type Action = FilterListAction;

    const DOMAIN: Domain = Domain::FilterLists;

    async fn fetch(&self, source: &Source<'_>) -> SyncResult<FilterLists> {
        let status = source.filtering_status().await?;
        Ok(FilterLists::from_status(&status))
    }

    fn diff(&self, primary: &FilterLists, secondary: &FilterLists) -> Vec<FilterListAction> {
        let mut removes = Vec::new();
        let mut adds = Vec::new();
        let mut mods = Vec::new();

        // allowlists go first within each phase
        for kind in [ListKind::Allow, ListKind::Block] {
            let p = primary.of(kind);
            let s = secondary.of(kind);

            for url in s.keys().filter(|url| !p.contains_key(*url)) {
                removes.push(FilterListAction::Remove {
                    kind,
                    url: url.clone(),
                });
            }

            for (url, want) in p {
                let modify = FilterListAction::Modify {
                    kind,
                    name: want.name.clone(),
                    url: url.clone(),
                    enabled: want.enabled,
                };
                match s.get(url) {
                    None => {
                        adds.push(FilterListAction::Add {
                            kind,
                            name: want.name.clone(),
                            url: url.clone(),
                        });
                        // add_url always enables the new list
                        if !want.enabled {
                            mods.push(modify);
                        }
                    }
                    Some(have) if have != want => mods.push(modify),
                    Some(_) => {}
                }
            }
        }

        removes.extend(adds);
        removes.extend(mods);
        removes
    }

    async fn apply(&self, target: &WriteSession<'_>, plan: &[FilterListAction]) -> SyncResult<()> {
        for action in plan {
            match action {
                FilterListAction::Remove { kind, url } => {
                    info!(domain = %Self::DOMAIN, action = "delete", list = kind.as_str(), key = %url, "removing filter list");
                    let body = FilterUrlRemove {
                        url,
                        whitelist: kind.is_allow(),
                    };
                    target.post(FILTERING_REMOVE_URL, &body).await?;
                }
                FilterListAction::Add { kind, name, url } => {
                    info!(domain = %Self::DOMAIN, action = "add", list = kind.as_str(), key = %url, name = %name, "adding filter list");
                    let body = FilterUrlAdd {
                        name,
                        url,
                        whitelist: kind.is_allow(),
                    };
                    target.post(FILTERING_ADD_URL, &body).await?;
                }
                FilterListAction::Modify {
                    kind,
                    name,
                    url,
                    enabled,
                } => {
                    info!(domain = %Self::DOMAIN, action = "modify", list = kind.as_str(), key = %url, name = %name, enabled, "updating filter list");
                    let body = FilterUrlSet {
                        url,
                        data: FilterUrlData {
                            name,
                            url,
                            enabled: *enabled,
                        },
                        whitelist: kind.is_allow(),
                    };
                    target.post(FILTERING_SET_URL, &body).await?;
                }
            }
        }
        Ok(())
    }
}
