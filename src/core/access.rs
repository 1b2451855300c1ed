use std::{collections::BTreeSet, sync::Arc};

use chrono::NaiveDate;

use crate::{
    content::{ContentRepository, GrantStore},
    models::Identity,
    types::JournalId,
};

/// Decides which journals an identity may search.
///
/// Fails closed: lookup errors are logged and treated as "no access".
#[derive(Clone)]
pub struct AccessResolver {
    content: Arc<dyn ContentRepository>,
    grants: Arc<dyn GrantStore>,
}

impl AccessResolver {
    pub fn new(content: Arc<dyn ContentRepository>, grants: Arc<dyn GrantStore>) -> Self {
        Self { content, grants }
    }

    pub async fn resolve(
        &self,
        identity: &Identity,
        target: Option<JournalId>,
    ) -> BTreeSet<JournalId> {
        self.resolve_on(identity, target, chrono::Local::now().date_naive())
            .await
    }

    pub async fn resolve_on(
        &self,
        identity: &Identity,
        target: Option<JournalId>,
        today: NaiveDate,
    ) -> BTreeSet<JournalId> {
        let Some(id) = identity.id.as_deref() else {
            return BTreeSet::new();
        };

        let accessible: BTreeSet<JournalId> = if identity.is_admin {
            match self.content.journal_ids().await {
                Ok(ids) => ids.into_iter().collect(),
                Err(err) => {
                    log::warn!("Failed to list journals for admin {}: {}", id, err);
                    return BTreeSet::new();
                }
            }
        } else {
            match self.grants.valid_journal_ids(id, today).await {
                Ok(ids) => ids.into_iter().collect(),
                Err(err) => {
                    log::warn!("Failed to load grants of {}: {}", id, err);
                    return BTreeSet::new();
                }
            }
        };

        match target {
            Some(journal_id) => accessible
                .into_iter()
                .filter(|id| *id == journal_id)
                .collect(),
            None => accessible,
        }
    }
}
