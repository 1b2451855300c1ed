use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    models::{AboutPage, ContentItem, ContentType, Page},
    types::{ItemId, JournalId, PageId},
};

pub mod memory;

pub use memory::MemoryContent;

/// Read-only view of the page tree and the media it references
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Every journal on the platform
    async fn journal_ids(&self) -> Result<Vec<JournalId>>;

    /// Live about pages of the given journals
    async fn about_pages(&self, journal_ids: &[JournalId]) -> Result<Vec<AboutPage>>;

    /// About page of one journal, whatever its publishing state
    async fn about_page(&self, journal_id: JournalId) -> Result<Option<AboutPage>>;

    /// All pages below an about page, regardless of their publishing state
    async fn descendant_pages(&self, about_page_id: PageId) -> Result<Vec<Page>>;

    /// Items of one collection by id, unknown ids are left out
    async fn items(&self, content_type: ContentType, ids: &[ItemId]) -> Result<Vec<ContentItem>>;
}

/// Source of journal access grants
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Journals with a non-revoked grant expiring on or after `today`
    async fn valid_journal_ids(&self, identity: &str, today: NaiveDate) -> Result<HashSet<JournalId>>;
}
