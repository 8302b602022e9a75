//! DNS rewrite entries.
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tracing::info;

use super::{Domain, DomainReconciler, Source};
use crate::adguard::types::RewriteEntry;
use crate::auth::WriteSession;
use crate::error::SyncResult;

pub const REWRITE_LIST: &str = "/control/rewrite/list";
pub const REWRITE_ADD: &str = "/control/rewrite/add";
pub const REWRITE_DELETE: &str = "/control/rewrite/delete";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryAction {
    Add(RewriteEntry),
    Delete(RewriteEntry),
    /// Same domain, single answer on both sides, answer changed.
    Update {
        domain: String,
        old_answer: String,
        new_answer: String,
    },
}

pub struct EntriesReconciler;

fn answers_by_domain(entries: &[RewriteEntry]) -> BTreeMap<&str, BTreeSet<&str>> {
    let mut map: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for e in entries {
        map.entry(e.domain.as_str())
            .or_default()
            .insert(e.answer.as_str());
    }
    map
}

#[async_trait]
impl DomainReconciler for EntriesReconciler {
    type State = Vec<RewriteEntry>;
    type Action = EntryAction;

    const DOMAIN: Domain = Domain::Entries;

    async fn fetch(&self, source: &Source<'_>) -> SyncResult<Self::State> {
        source.session.get(REWRITE_LIST).await
    }

    fn diff(&self, primary: &Self::State, secondary: &Self::State) -> Vec<EntryAction> {
        let primary = answers_by_domain(primary);
        let secondary = answers_by_domain(secondary);
        let empty = BTreeSet::new();

        let domains: BTreeSet<&str> = primary.keys().chain(secondary.keys()).copied().collect();

        let mut deletes = Vec::new();
        let mut updates = Vec::new();
        let mut adds = Vec::new();

        for domain in domains {
            let p = primary.get(domain).unwrap_or(&empty);
            let s = secondary.get(domain).unwrap_or(&empty);
            if p == s {
                continue;
            }

            if let ([new], [old]) = (
                p.iter().copied().collect::<Vec<_>>().as_slice(),
                s.iter().copied().collect::<Vec<_>>().as_slice(),
            ) {
                updates.push(EntryAction::Update {
                    domain: domain.to_string(),
                    old_answer: old.to_string(),
                    new_answer: new.to_string(),
                });
                continue;
            }

            for answer in s.difference(p) {
                deletes.push(EntryAction::Delete(RewriteEntry::new(domain, *answer)));
            }
            for answer in p.difference(s) {
                adds.push(EntryAction::Add(RewriteEntry::new(domain, *answer)));
            }
        }

        deletes.extend(updates);
        deletes.extend(adds);
        deletes
    }

    async fn apply(&self, target: &WriteSession<'_>, plan: &[EntryAction]) -> SyncResult<()> {
        // every removal goes out before any insertion
        for action in plan {
            match action {
                EntryAction::Delete(entry) => {
                    info!(domain = %Self::DOMAIN, action = "delete", key = %entry.domain, answer = %entry.answer, "deleting rewrite entry");
                    target.post(REWRITE_DELETE, entry).await?;
                }
                EntryAction::Update {
                    domain,
                    old_answer,
                    new_answer,
                } => {
                    info!(domain = %Self::DOMAIN, action = "update", key = %domain, before = %old_answer, after = %new_answer, "replacing rewrite entry");
                    target
                        .post(REWRITE_DELETE, &RewriteEntry::new(domain, old_answer))
                        .await?;
                }
                EntryAction::Add(_) => {}
            }
        }

        for action in plan {
            match action {
                EntryAction::Add(entry) => {
                    info!(domain = %Self::DOMAIN, action = "add", key = %entry.domain, answer = %entry.answer, "adding rewrite entry");
                    target.post(REWRITE_ADD, entry).await?;
                }
                EntryAction::Update {
                    domain, new_answer, ..
                } => {
                    target
                        .post(REWRITE_ADD, &RewriteEntry::new(domain, new_answer))
                        .await?;
                }
                EntryAction::Delete(_) => {}
            }
        }

        Ok(())
    }
}
