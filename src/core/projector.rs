use crate::{
    core::{ScoredItem, SearchScope},
    models::{ContentItem, Page, SearchHit, span_id},
};

/// Turns scored items into hits, one per visible page showing the item
pub struct HitProjector<'a> {
    scope: &'a SearchScope,
}

impl<'a> HitProjector<'a> {
    pub fn new(scope: &'a SearchScope) -> Self {
        Self { scope }
    }

    pub fn project(&self, scored: &ScoredItem) -> Vec<SearchHit> {
        let content_type = scored.item.content_type();
        let item_id = scored.item.id();

        if let ContentItem::Page(page) = &scored.item {
            return match self.scope.page(page.id) {
                Some(page) => vec![self.hit(page, scored)],
                None => {
                    log::debug!(
                        "Page {} is not part of journal {}",
                        page.id,
                        self.scope.about.journal_id
                    );
                    Vec::new()
                }
            };
        }

        let page_ids = self.scope.referencing_pages(content_type, item_id);
        if page_ids.is_empty() {
            log::debug!("No visible page shows {} {}", content_type, item_id);
        }

        page_ids
            .iter()
            .filter_map(|page_id| self.scope.page(*page_id))
            .map(|page| self.hit(page, scored))
            .collect()
    }

    fn hit(&self, page: &Page, scored: &ScoredItem) -> SearchHit {
        let about = &self.scope.about;
        let block_type = scored.item.block_type();
        let block_id = scored.item.id();

        SearchHit {
            page_id: page.id,
            page_title: page.title.clone(),
            page_path: page.url_path.clone(),
            breadcrumbs: self.scope.breadcrumbs(page.id).to_vec(),
            journal_about_page_id: about.id,
            journal_id: about.journal_id,
            journal_name: about.title.clone(),
            block_id,
            block_title: scored.item.title().to_string(),
            block_type,
            highlights: scored.highlights.clone(),
            score: scored.score,
            span_id: span_id(block_type, block_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        content::ContentRepository,
        models::{BlockType, ContentType, Document},
        testing,
    };

    async fn physics() -> SearchScope {
        let content = testing::platform();
        let about = content.about_pages(&[testing::PHYSICS]).await.unwrap().remove(0);
        let pages = content.descendant_pages(about.id).await.unwrap();
        SearchScope::new(about, pages)
    }

    async fn item(content_type: ContentType, id: u64) -> ContentItem {
        testing::platform()
            .items(content_type, &[id])
            .await
            .unwrap()
            .remove(0)
    }

    fn scored(item: ContentItem, score: f64) -> ScoredItem {
        ScoredItem {
            item,
            score,
            highlights: vec!["<b>match</b>".to_string()],
        }
    }

    #[tokio::test]
    async fn test_page_hit() {
        let scope = physics().await;
        let page = item(ContentType::PageBody, 103).await;

        let hits = HitProjector::new(&scope).project(&scored(page, 1.5));
        assert_eq!(hits.len(), 1);

        let hit = &hits[0];
        assert_eq!(hit.block_type, BlockType::RichText);
        assert_eq!(hit.block_id, 103);
        assert_eq!(hit.page_id, 103);
        assert_eq!(hit.page_path, "/physics/chapter-one/measurements/");
        assert_eq!(hit.breadcrumbs, vec!["Chapter One".to_string()]);
        assert_eq!(hit.journal_id, testing::PHYSICS);
        assert_eq!(hit.journal_about_page_id, testing::PHYSICS_ABOUT);
        assert_eq!(hit.journal_name, "Physics Journal");
        assert_eq!(hit.span_id, "");
        assert_eq!(hit.highlights, vec!["<b>match</b>".to_string()]);
    }

    #[tokio::test]
    async fn test_document_hit_per_page() {
        let scope = physics().await;
        let document = item(ContentType::Document, 10).await;

        let hits = HitProjector::new(&scope).project(&scored(document, 2.0));

        let pages: Vec<_> = hits.iter().map(|hit| hit.page_id).collect();
        assert_eq!(pages, vec![101, 103]);
        for hit in &hits {
            assert_eq!(hit.block_id, 10);
            assert_eq!(hit.block_title, "Annual Report");
            assert_eq!(hit.block_type, BlockType::Pdf);
            assert_eq!(hit.score, 2.0);
            assert_eq!(hit.span_id, span_id(BlockType::Pdf, 10));
        }
        assert_eq!(hits[0].page_title, "Introduction");
        assert!(hits[0].breadcrumbs.is_empty());
        assert_eq!(hits[1].page_title, "Measurements");
        assert_eq!(hits[1].breadcrumbs, vec!["Chapter One".to_string()]);
    }

    #[tokio::test]
    async fn test_orphaned_items_skipped() {
        let scope = physics().await;

        let orphan = ContentItem::Document(Document {
            id: 11,
            title: "Orphan report".to_string(),
            ..Default::default()
        });
        assert!(HitProjector::new(&scope).project(&scored(orphan, 1.0)).is_empty());

        // Draft page
        let draft = item(ContentType::PageBody, 104).await;
        assert!(HitProjector::new(&scope).project(&scored(draft, 1.0)).is_empty());
    }
}
