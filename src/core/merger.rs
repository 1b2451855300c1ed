use crate::models::SearchHit;

/// Collects hits of all typed searches in ascending score order.
///
/// Each insert is a binary search followed by a shift, hits arrive in small
/// batches so no final sort pass is needed. Equal scores keep their insertion
/// order once finalized.
#[derive(Debug, Default)]
pub struct RankedMerger {
    hits: Vec<SearchHit>,
}

impl RankedMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hit: SearchHit) {
        let idx = self
            .hits
            .partition_point(|existing| existing.score.total_cmp(&hit.score).is_lt());
        self.hits.insert(idx, hit);
    }

    pub fn extend(&mut self, hits: impl IntoIterator<Item = SearchHit>) {
        for hit in hits {
            self.insert(hit);
        }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Highest score first
    pub fn finalize(self) -> Vec<SearchHit> {
        let mut hits = self.hits;
        hits.reverse();
        hits
    }
}
