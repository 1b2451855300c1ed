use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::{
    config::Config,
    models::{ContentItem, ContentType, Operator},
    types::ItemId,
};

/// A candidate accepted by the full-text index
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    pub id: ItemId,
    pub score: f64,
    pub highlights: Vec<String>,
}

/// Full-text index answering typed queries.
///
/// Only `candidates` may be returned; matches come back best first.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(
        &self,
        content_type: ContentType,
        candidates: &[ContentItem],
        query: &str,
        operator: Operator,
    ) -> Result<Vec<ScoredMatch>>;
}

pub mod elasticsearch;
pub mod local;

pub use elasticsearch::Elasticsearch;
pub use local::LocalIndex;

pub(crate) type SharedOracle = Arc<dyn ScoringOracle>;

pub(crate) fn from_config(config: &Config) -> Result<SharedOracle> {
    match config.elasticsearch.active_url() {
        Some(url) => {
            log::info!("Using elasticsearch at {}", url);
            Ok(Arc::new(Elasticsearch::new(
                url,
                config.elasticsearch.index_prefix(),
                config.elasticsearch.timeout(),
            )?))
        }
        None => {
            log::info!("No elasticsearch configured, using the local index");
            Ok(Arc::new(LocalIndex::new()))
        }
    }
}
