use serde::{Deserialize, Serialize};

use crate::models::{ContentType, SearchHit};

/// Per-type match counts of a single search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMetaData {
    /// Number of hits returned
    pub total_count: usize,
    /// Matched pages
    pub text_count: usize,
    /// Matched images, documents and videos, regardless of how many pages use them
    pub image_count: usize,
    pub video_count: usize,
    pub doc_count: usize,
}

impl SearchMetaData {
    pub(crate) fn add_matches(&mut self, content_type: ContentType, matched: usize) {
        match content_type {
            ContentType::PageBody => self.text_count += matched,
            ContentType::Document => self.doc_count += matched,
            ContentType::Image => self.image_count += matched,
            ContentType::Video => self.video_count += matched,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub meta: SearchMetaData,
    /// Highest score first
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    pub fn empty() -> Self {
        Self::default()
    }
}
