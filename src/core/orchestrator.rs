use std::{sync::Arc, time::Duration};

use futures::future::try_join_all;
use tokio::task::{JoinHandle, JoinSet};

use crate::{
    content::{ContentRepository, GrantStore},
    core::{
        AccessResolver, HitProjector, QueryPopularity, RankedMerger, SearchScope,
        TypedSearchExecutor,
    },
    engines::SharedOracle,
    error::SearchError,
    models::{ContentType, SearchHit, SearchMetaData, SearchRequest, SearchResults, query},
    types::JournalId,
};

/// Output of one (journal, content type) task
struct TypedHits {
    content_type: ContentType,
    matched: usize,
    hits: Vec<SearchHit>,
}

/// Entry point of a search: access, fan-out, projection and merge
#[derive(Clone)]
pub struct SearchOrchestrator {
    content: Arc<dyn ContentRepository>,
    access: AccessResolver,
    executor: TypedSearchExecutor,
    popularity: Arc<dyn QueryPopularity>,
    timeout: Duration,
}

impl SearchOrchestrator {
    pub fn new(
        content: Arc<dyn ContentRepository>,
        grants: Arc<dyn GrantStore>,
        oracle: SharedOracle,
        popularity: Arc<dyn QueryPopularity>,
        timeout: Duration,
    ) -> Self {
        Self {
            access: AccessResolver::new(Arc::clone(&content), grants),
            executor: TypedSearchExecutor::new(Arc::clone(&content), oracle),
            content,
            popularity,
            timeout,
        }
    }

    pub fn popularity(&self) -> &Arc<dyn QueryPopularity> {
        &self.popularity
    }

    pub async fn execute(&self, request: &SearchRequest) -> Result<SearchResults, SearchError> {
        let journal_ids = self
            .access
            .resolve(&request.identity, request.journal_id)
            .await;
        if journal_ids.is_empty() && request.journal_id.is_some() {
            log::debug!("No access to journal {:?}", request.journal_id);
            return Ok(SearchResults::empty());
        }

        let Some(query) = request.query_text() else {
            return Ok(SearchResults::empty());
        };

        log::info!(
            "Searching '{}' ({}, {}) in {} journals",
            query,
            request.operator,
            request.type_filter,
            journal_ids.len()
        );

        let journal_ids: Vec<_> = journal_ids.into_iter().collect();
        let results =
            tokio::time::timeout(self.timeout, self.fan_out(&journal_ids, query, request))
                .await
                .map_err(|_| SearchError::Timeout(self.timeout))??;

        self.record_popularity(query);

        log::info!("Search '{}' returned {} hits", query, results.meta.total_count);
        Ok(results)
    }

    /// A targeted journal is searched through its about page whatever its publishing
    /// state, otherwise only live about pages count
    async fn load_scopes(
        &self,
        journal_ids: &[JournalId],
        target: Option<JournalId>,
    ) -> Result<Vec<Arc<SearchScope>>, SearchError> {
        let about_pages = match target {
            Some(journal_id) => self
                .content
                .about_page(journal_id)
                .await
                .map(|about| about.into_iter().collect()),
            None => self.content.about_pages(journal_ids).await,
        }
        .map_err(SearchError::Repository)?;

        try_join_all(about_pages.into_iter().map(|about| async move {
            let pages = self.content.descendant_pages(about.id).await?;
            Ok::<_, anyhow::Error>(Arc::new(SearchScope::new(about, pages)))
        }))
        .await
        .map_err(SearchError::Repository)
    }

    async fn fan_out(
        &self,
        journal_ids: &[JournalId],
        query: &str,
        request: &SearchRequest,
    ) -> Result<SearchResults, SearchError> {
        let scopes = self.load_scopes(journal_ids, request.journal_id).await?;

        let mut tasks = JoinSet::new();
        let mut task_count = 0;
        for scope in &scopes {
            for content_type in request.type_filter.content_types() {
                let idx = task_count;
                task_count += 1;

                let scope = Arc::clone(scope);
                let executor = self.executor.clone();
                let query = query.to_string();
                let operator = request.operator;

                tasks.spawn(async move {
                    let scored = executor
                        .search(&scope, content_type, &query, operator)
                        .await?;

                    let projector = HitProjector::new(&scope);
                    let hits = scored.iter().flat_map(|item| projector.project(item)).collect();

                    Ok::<_, SearchError>((
                        idx,
                        TypedHits {
                            content_type,
                            matched: scored.len(),
                            hits,
                        },
                    ))
                });
            }
        }

        let mut gathered: Vec<Option<TypedHits>> = (0..task_count).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            // Dropping the set aborts the remaining tasks
            let (idx, typed) = joined??;
            gathered[idx] = Some(typed);
        }

        let mut meta = SearchMetaData::default();
        let mut merger = RankedMerger::new();
        for typed in gathered.into_iter().flatten() {
            meta.add_matches(typed.content_type, typed.matched);
            merger.extend(typed.hits);
        }
        meta.total_count = merger.len();

        Ok(SearchResults {
            meta,
            hits: merger.finalize(),
        })
    }

    /// Records the query in the background, giving up after the request timeout
    fn record_popularity(&self, query: &str) -> JoinHandle<()> {
        let popularity = Arc::clone(&self.popularity);
        let normalized = query::normalize_query(query);
        let timeout = self.timeout;

        tokio::spawn(async move {
            match tokio::time::timeout(timeout, popularity.record_hit(&normalized)).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => log::warn!(
                    "Failed to record query '{}' in {}: {}",
                    normalized,
                    popularity.name(),
                    err
                ),
                Err(_) => log::warn!(
                    "Recording query '{}' in {} timed out",
                    normalized,
                    popularity.name()
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use anyhow::{Result, anyhow};
    use async_trait::async_trait;

    use super::*;
    use crate::{
        core::{MemoryPopularity, popularity::PopularQuery},
        engines::{LocalIndex, ScoredMatch, ScoringOracle},
        models::{BlockType, ContentItem, Identity, Operator, TypeFilter},
        testing::{self, HISTORY, PHYSICS},
    };

    struct Unavailable;

    #[async_trait]
    impl ScoringOracle for Unavailable {
        fn name(&self) -> &'static str {
            "unavailable"
        }

        async fn search(
            &self,
            _: ContentType,
            _: &[ContentItem],
            _: &str,
            _: Operator,
        ) -> Result<Vec<ScoredMatch>> {
            Err(anyhow!("index closed"))
        }
    }

    struct Slow;

    #[async_trait]
    impl ScoringOracle for Slow {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn search(
            &self,
            _: ContentType,
            _: &[ContentItem],
            _: &str,
            _: Operator,
        ) -> Result<Vec<ScoredMatch>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(vec![])
        }
    }

    struct BrokenPopularity;

    #[async_trait]
    impl QueryPopularity for BrokenPopularity {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn record_hit(&self, _: &str) -> Result<()> {
            Err(anyhow!("sink offline"))
        }

        async fn top(&self, _: usize) -> Result<Vec<PopularQuery>> {
            Ok(vec![])
        }
    }

    struct StalledPopularity;

    #[async_trait]
    impl QueryPopularity for StalledPopularity {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn record_hit(&self, _: &str) -> Result<()> {
            std::future::pending().await
        }

        async fn top(&self, _: usize) -> Result<Vec<PopularQuery>> {
            Ok(vec![])
        }
    }

    fn orchestrator_with(
        oracle: SharedOracle,
        popularity: Arc<dyn QueryPopularity>,
        timeout: Duration,
    ) -> SearchOrchestrator {
        let content = testing::shared_platform();
        SearchOrchestrator::new(content.clone(), content, oracle, popularity, timeout)
    }

    fn orchestrator() -> SearchOrchestrator {
        orchestrator_with(
            Arc::new(LocalIndex::new()),
            Arc::new(MemoryPopularity::new()),
            Duration::from_secs(5),
        )
    }

    fn request(
        identity: Identity,
        journal_id: Option<u64>,
        query: &str,
        operator: Operator,
        type_filter: TypeFilter,
    ) -> SearchRequest {
        SearchRequest {
            identity,
            query: Some(query.to_string()),
            operator,
            type_filter,
            journal_id,
        }
    }

    fn assert_ordered(results: &SearchResults) {
        assert_eq!(results.meta.total_count, results.hits.len());
        for pair in results.hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_document_on_two_pages() {
        let results = orchestrator()
            .execute(&request(
                Identity::user("reader"),
                None,
                "report",
                Operator::Or,
                TypeFilter::Documents,
            ))
            .await
            .unwrap();

        assert_ordered(&results);
        assert_eq!(results.meta.doc_count, 1);
        assert_eq!(results.meta.total_count, 2);
        assert_eq!(results.hits[0].score, results.hits[1].score);
        assert_eq!(results.hits[0].block_id, results.hits[1].block_id);

        let pages: HashSet<_> = results.hits.iter().map(|hit| hit.page_id).collect();
        assert_eq!(pages, HashSet::from([101, 103]));
    }

    #[tokio::test]
    async fn test_type_isolation() {
        let results = orchestrator()
            .execute(&request(
                Identity::admin("root"),
                None,
                "report",
                Operator::Or,
                TypeFilter::Documents,
            ))
            .await
            .unwrap();

        assert!(results.hits.iter().all(|hit| hit.block_type == BlockType::Pdf));
        assert_eq!(results.meta.text_count, 0);
        assert_eq!(results.meta.image_count, 0);
        assert_eq!(results.meta.video_count, 0);
    }

    #[tokio::test]
    async fn test_grants_limit_journals() {
        let results = orchestrator()
            .execute(&request(
                Identity::user("reader"),
                None,
                "report waves",
                Operator::Or,
                TypeFilter::All,
            ))
            .await
            .unwrap();

        assert_ordered(&results);
        assert!(!results.hits.is_empty());
        assert!(results.hits.iter().all(|hit| hit.journal_id == PHYSICS));
    }

    #[tokio::test]
    async fn test_expired_grant_gets_nothing() {
        let results = orchestrator()
            .execute(&request(
                Identity::user("lapsed"),
                Some(PHYSICS),
                "report",
                Operator::Or,
                TypeFilter::All,
            ))
            .await
            .unwrap();

        assert_eq!(results.meta, SearchMetaData::default());
        assert!(results.hits.is_empty());
    }

    #[tokio::test]
    async fn test_admin_searches_every_journal() {
        let results = orchestrator()
            .execute(&request(
                Identity::admin("root"),
                None,
                "report",
                Operator::Or,
                TypeFilter::All,
            ))
            .await
            .unwrap();

        assert_ordered(&results);
        let journals: HashSet<_> = results.hits.iter().map(|hit| hit.journal_id).collect();
        assert_eq!(journals, HashSet::from([PHYSICS, HISTORY]));

        // Annual Report on two pages, War report on one, and the lecture video
        assert_eq!(results.meta.doc_count, 2);
        assert_eq!(results.meta.video_count, 1);
        assert_eq!(results.meta.text_count, 0);
        assert_eq!(results.meta.total_count, 4);
    }

    #[tokio::test]
    async fn test_phrase_operator() {
        let orchestrator = orchestrator();

        let phrase = orchestrator
            .execute(&request(
                Identity::admin("root"),
                Some(PHYSICS),
                "the quick brown fox",
                Operator::And,
                TypeFilter::All,
            ))
            .await
            .unwrap();
        let pages: Vec<_> = phrase.hits.iter().map(|hit| hit.page_id).collect();
        assert_eq!(pages, vec![101]);
        assert_eq!(phrase.meta.text_count, 1);

        let any = orchestrator
            .execute(&request(
                Identity::admin("root"),
                Some(PHYSICS),
                "the quick brown fox",
                Operator::Or,
                TypeFilter::All,
            ))
            .await
            .unwrap();
        assert_ordered(&any);
        assert_eq!(any.hits[0].page_id, 102);
        assert_eq!(any.meta.text_count, 2);
        assert_eq!(any.meta.image_count, 1);
        assert_eq!(any.meta.video_count, 1);
    }

    #[tokio::test]
    async fn test_empty_query_never_reaches_oracle() {
        let orchestrator = orchestrator_with(
            Arc::new(Unavailable),
            Arc::new(MemoryPopularity::new()),
            Duration::from_secs(5),
        );

        for query in [None, Some(String::new()), Some("   ".to_string())] {
            let results = orchestrator
                .execute(&SearchRequest {
                    identity: Identity::admin("root"),
                    query,
                    ..Default::default()
                })
                .await
                .unwrap();
            assert_eq!(results.meta, SearchMetaData::default());
            assert!(results.hits.is_empty());
        }
    }

    #[tokio::test]
    async fn test_oracle_failure_aborts_request() {
        let orchestrator = orchestrator_with(
            Arc::new(Unavailable),
            Arc::new(MemoryPopularity::new()),
            Duration::from_secs(5),
        );

        let err = orchestrator
            .execute(&request(
                Identity::admin("root"),
                None,
                "report",
                Operator::Or,
                TypeFilter::All,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::OracleUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let orchestrator = orchestrator_with(
            Arc::new(Slow),
            Arc::new(MemoryPopularity::new()),
            Duration::from_millis(50),
        );

        let err = orchestrator
            .execute(&request(
                Identity::admin("root"),
                None,
                "report",
                Operator::Or,
                TypeFilter::All,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_popularity_recorded_normalized() {
        let popularity = Arc::new(MemoryPopularity::new());
        let orchestrator = orchestrator_with(
            Arc::new(LocalIndex::new()),
            popularity.clone(),
            Duration::from_secs(5),
        );

        orchestrator
            .execute(&request(
                Identity::user("reader"),
                None,
                "  Brown   FOX ",
                Operator::Or,
                TypeFilter::All,
            ))
            .await
            .unwrap();

        let mut top = vec![];
        for _ in 0..100 {
            top = popularity.top(10).await.unwrap();
            if !top.is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(
            top,
            vec![PopularQuery {
                query: "brown fox".to_string(),
                hits: 1
            }]
        );
    }

    #[tokio::test]
    async fn test_popularity_failure_ignored() {
        let orchestrator = orchestrator_with(
            Arc::new(LocalIndex::new()),
            Arc::new(BrokenPopularity),
            Duration::from_secs(5),
        );

        let results = orchestrator
            .execute(&request(
                Identity::user("reader"),
                None,
                "fox",
                Operator::Or,
                TypeFilter::Images,
            ))
            .await
            .unwrap();
        assert_eq!(results.meta.image_count, 1);
        assert_eq!(results.hits[0].block_type, BlockType::Image);
    }

    #[tokio::test]
    async fn test_stalled_popularity_gives_up() {
        let orchestrator = orchestrator_with(
            Arc::new(LocalIndex::new()),
            Arc::new(StalledPopularity),
            Duration::from_millis(50),
        );

        let recording = orchestrator.record_popularity("fox");
        let finished = tokio::time::timeout(Duration::from_secs(5), recording).await;
        assert!(finished.is_ok());
    }

    #[tokio::test]
    async fn test_targeted_draft_journal_is_searched() {
        let mut snapshot = testing::snapshot();
        snapshot.about_pages[1].live = false;
        let content = Arc::new(crate::content::MemoryContent::new(snapshot));
        let orchestrator = SearchOrchestrator::new(
            content.clone(),
            content,
            Arc::new(LocalIndex::new()),
            Arc::new(MemoryPopularity::new()),
            Duration::from_secs(5),
        );
        let admin = || Identity::admin("root");

        let targeted = orchestrator
            .execute(&request(admin(), Some(HISTORY), "migration", Operator::Or, TypeFilter::All))
            .await
            .unwrap();
        assert_eq!(targeted.meta.text_count, 1);
        assert!(targeted.hits.iter().all(|hit| hit.journal_id == HISTORY));

        let everywhere = orchestrator
            .execute(&request(admin(), None, "migration", Operator::Or, TypeFilter::All))
            .await
            .unwrap();
        assert_eq!(everywhere.meta.total_count, 0);
    }
}
