use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularQuery {
    pub query: String,
    pub hits: u64,
}

/// Counts how often queries are searched
#[async_trait]
pub trait QueryPopularity: Send + Sync {
    fn name(&self) -> &'static str;

    async fn record_hit(&self, query: &str) -> Result<()>;

    /// Most searched queries first
    async fn top(&self, limit: usize) -> Result<Vec<PopularQuery>>;
}

/// Process local counters, lost on restart
#[derive(Debug, Default)]
pub struct MemoryPopularity {
    counts: DashMap<String, u64>,
}

impl MemoryPopularity {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueryPopularity for MemoryPopularity {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn record_hit(&self, query: &str) -> Result<()> {
        *self.counts.entry(query.to_string()).or_insert(0) += 1;
        Ok(())
    }

    async fn top(&self, limit: usize) -> Result<Vec<PopularQuery>> {
        let mut queries: Vec<PopularQuery> = self
            .counts
            .iter()
            .map(|entry| PopularQuery {
                query: entry.key().clone(),
                hits: *entry.value(),
            })
            .collect();
        queries.sort_by(|a, b| b.hits.cmp(&a.hits).then_with(|| a.query.cmp(&b.query)));
        queries.truncate(limit);
        Ok(queries)
    }
}
