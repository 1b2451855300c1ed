use std::{
    collections::{HashMap, HashSet, VecDeque},
    path::Path,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    content::{ContentRepository, GrantStore},
    models::{AboutPage, AccessGrant, ContentItem, ContentType, Document, Image, Page, Video},
    types::{ItemId, JournalId, PageId},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    pub id: JournalId,
}

/// Serialized platform state the in-memory repository is loaded from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub journals: Vec<Journal>,
    pub about_pages: Vec<AboutPage>,
    pub pages: Vec<Page>,
    pub documents: Vec<Document>,
    pub images: Vec<Image>,
    pub videos: Vec<Video>,
    pub grants: Vec<AccessGrant>,
}

#[derive(Debug, Default)]
pub struct MemoryContent {
    journal_ids: Vec<JournalId>,
    about_pages: Vec<AboutPage>,
    pages: HashMap<PageId, Page>,
    children: HashMap<PageId, Vec<PageId>>,
    documents: HashMap<ItemId, Document>,
    images: HashMap<ItemId, Image>,
    videos: HashMap<ItemId, Video>,
    grants: Vec<AccessGrant>,
}

impl MemoryContent {
    pub fn new(snapshot: Snapshot) -> Self {
        let mut journal_ids: Vec<JournalId> = snapshot
            .journals
            .iter()
            .map(|journal| journal.id)
            .chain(snapshot.about_pages.iter().map(|about| about.journal_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        journal_ids.sort_unstable();

        let mut children: HashMap<PageId, Vec<PageId>> = HashMap::new();
        for page in &snapshot.pages {
            if let Some(parent_id) = page.parent_id {
                children.entry(parent_id).or_default().push(page.id);
            }
        }
        for siblings in children.values_mut() {
            siblings.sort_unstable();
        }

        Self {
            journal_ids,
            about_pages: snapshot.about_pages,
            pages: snapshot.pages.into_iter().map(|p| (p.id, p)).collect(),
            children,
            documents: snapshot.documents.into_iter().map(|d| (d.id, d)).collect(),
            images: snapshot.images.into_iter().map(|i| (i.id, i)).collect(),
            videos: snapshot.videos.into_iter().map(|v| (v.id, v)).collect(),
            grants: snapshot.grants,
        }
    }

    pub async fn from_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

        log::info!(
            "Loaded snapshot with {} journals, {} pages, {} documents, {} images, {} videos",
            snapshot.journals.len(),
            snapshot.pages.len(),
            snapshot.documents.len(),
            snapshot.images.len(),
            snapshot.videos.len()
        );

        Ok(Self::new(snapshot))
    }
}

#[async_trait]
impl ContentRepository for MemoryContent {
    async fn journal_ids(&self) -> Result<Vec<JournalId>> {
        Ok(self.journal_ids.clone())
    }

    async fn about_pages(&self, journal_ids: &[JournalId]) -> Result<Vec<AboutPage>> {
        Ok(self
            .about_pages
            .iter()
            .filter(|about| about.live && journal_ids.contains(&about.journal_id))
            .cloned()
            .collect())
    }

    async fn about_page(&self, journal_id: JournalId) -> Result<Option<AboutPage>> {
        Ok(self
            .about_pages
            .iter()
            .find(|about| about.journal_id == journal_id)
            .cloned())
    }

    async fn descendant_pages(&self, about_page_id: PageId) -> Result<Vec<Page>> {
        let mut found = Vec::new();
        let mut seen = HashSet::from([about_page_id]);
        let mut queue = VecDeque::from([about_page_id]);

        while let Some(parent_id) = queue.pop_front() {
            for child_id in self.children.get(&parent_id).into_iter().flatten() {
                if !seen.insert(*child_id) {
                    continue;
                }
                if let Some(page) = self.pages.get(child_id) {
                    found.push(page.clone());
                    queue.push_back(*child_id);
                }
            }
        }

        Ok(found)
    }

    async fn items(&self, content_type: ContentType, ids: &[ItemId]) -> Result<Vec<ContentItem>> {
        let items = ids.iter().filter_map(|id| match content_type {
            ContentType::PageBody => self.pages.get(id).cloned().map(ContentItem::Page),
            ContentType::Document => self.documents.get(id).cloned().map(ContentItem::Document),
            ContentType::Image => self.images.get(id).cloned().map(ContentItem::Image),
            ContentType::Video => self.videos.get(id).cloned().map(ContentItem::Video),
        });

        Ok(items.collect())
    }
}

#[async_trait]
impl GrantStore for MemoryContent {
    async fn valid_journal_ids(&self, identity: &str, today: NaiveDate) -> Result<HashSet<JournalId>> {
        Ok(self
            .grants
            .iter()
            .filter(|grant| grant.identity == identity && grant.is_valid_on(today))
            .map(|grant| grant.journal_id)
            .collect())
    }
}
