use std::{collections::HashMap, sync::Arc};

use crate::{
    content::ContentRepository,
    core::SearchScope,
    engines::SharedOracle,
    error::SearchError,
    models::{ContentItem, ContentType, Operator},
};

/// A content item accepted by the scoring oracle
#[derive(Debug, Clone)]
pub struct ScoredItem {
    pub item: ContentItem,
    pub score: f64,
    pub highlights: Vec<String>,
}

/// Runs one typed query against the items visible in a journal scope
#[derive(Clone)]
pub struct TypedSearchExecutor {
    content: Arc<dyn ContentRepository>,
    oracle: SharedOracle,
}

impl TypedSearchExecutor {
    pub fn new(content: Arc<dyn ContentRepository>, oracle: SharedOracle) -> Self {
        Self { content, oracle }
    }

    /// Items the oracle is allowed to match.
    ///
    /// Pages come straight from the scope, media only when a visible page
    /// references them.
    async fn candidates(
        &self,
        scope: &SearchScope,
        content_type: ContentType,
    ) -> Result<Vec<ContentItem>, SearchError> {
        if content_type == ContentType::PageBody {
            return Ok(scope.live_pages().cloned().map(ContentItem::Page).collect());
        }

        let ids = scope.referenced_items(content_type);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.content
            .items(content_type, &ids)
            .await
            .map_err(SearchError::Repository)
    }

    pub async fn search(
        &self,
        scope: &SearchScope,
        content_type: ContentType,
        query: &str,
        operator: Operator,
    ) -> Result<Vec<ScoredItem>, SearchError> {
        let query = query.trim();
        if query.is_empty() || scope.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self.candidates(scope, content_type).await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let matches = self
            .oracle
            .search(content_type, &candidates, query, operator)
            .await
            .map_err(|source| SearchError::OracleUnavailable {
                oracle: self.oracle.name(),
                source,
            })?;

        let mut by_id: HashMap<_, _> = candidates.into_iter().map(|item| (item.id(), item)).collect();
        let mut scored = Vec::with_capacity(matches.len());
        for matched in matches {
            match by_id.remove(&matched.id) {
                Some(item) => scored.push(ScoredItem {
                    item,
                    score: matched.score,
                    highlights: matched.highlights,
                }),
                None => log::warn!(
                    "{} returned {} {} outside of journal {}",
                    self.oracle.name(),
                    content_type,
                    matched.id,
                    scope.about.journal_id
                ),
            }
        }

        log::debug!(
            "{} {} matches in journal {}",
            scored.len(),
            content_type,
            scope.about.journal_id
        );

        Ok(scored)
    }
}
