use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::{
    models::{AboutPage, ContentType, Page},
    types::{ItemId, PageId},
};

/// The searchable part of one journal, indexed once per request.
///
/// Holds the live pages visible to the public below the about page together with
/// their breadcrumbs and a reverse index from referenced items to pages. A page
/// is visible when it is live and neither it nor any ancestor is private.
/// Pages not connected to the about page are never part of a scope.
#[derive(Debug, Clone)]
pub struct SearchScope {
    pub about: AboutPage,
    page_ids: Vec<PageId>,
    pages: HashMap<PageId, Page>,
    breadcrumbs: HashMap<PageId, Vec<String>>,
    references: HashMap<(ContentType, ItemId), Vec<PageId>>,
}

impl SearchScope {
    pub fn new(about: AboutPage, descendants: Vec<Page>) -> Self {
        let mut children: HashMap<PageId, Vec<Page>> = HashMap::new();
        for page in descendants {
            if let Some(parent_id) = page.parent_id {
                children.entry(parent_id).or_default().push(page);
            }
        }

        let mut pages = HashMap::new();
        let mut breadcrumbs = HashMap::new();
        let mut references: HashMap<(ContentType, ItemId), Vec<PageId>> = HashMap::new();

        // (page id, ancestors all public, live ancestor titles)
        let mut queue = VecDeque::from([(about.id, true, Vec::<String>::new())]);
        while let Some((parent_id, public, trail)) = queue.pop_front() {
            let Some(siblings) = children.remove(&parent_id) else {
                continue;
            };

            for page in siblings {
                let public = public && page.public;
                let mut child_trail = trail.clone();
                if page.live {
                    child_trail.push(page.title.clone());
                }
                queue.push_back((page.id, public, child_trail));

                if !(page.live && public) {
                    continue;
                }
                for content_type in ContentType::ALL {
                    for item_id in page.references(content_type) {
                        let referencing = references.entry((content_type, *item_id)).or_default();
                        if !referencing.contains(&page.id) {
                            referencing.push(page.id);
                        }
                    }
                }
                breadcrumbs.insert(page.id, trail.clone());
                pages.insert(page.id, page);
            }
        }

        let mut page_ids: Vec<PageId> = pages.keys().copied().collect();
        page_ids.sort_unstable();
        for referencing in references.values_mut() {
            referencing.sort_unstable();
        }

        Self {
            about,
            page_ids,
            pages,
            breadcrumbs,
            references,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.page_ids.is_empty()
    }

    /// Visible pages ordered by id
    pub fn live_pages(&self) -> impl Iterator<Item = &Page> {
        self.page_ids.iter().filter_map(|id| self.pages.get(id))
    }

    pub fn page(&self, page_id: PageId) -> Option<&Page> {
        self.pages.get(&page_id)
    }

    /// Titles of the live ancestors between the about page and the page, root first
    pub fn breadcrumbs(&self, page_id: PageId) -> &[String] {
        self.breadcrumbs
            .get(&page_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Distinct items of one type referenced by at least one visible page
    pub fn referenced_items(&self, content_type: ContentType) -> Vec<ItemId> {
        self.references
            .keys()
            .filter(|(ct, _)| *ct == content_type)
            .map(|(_, id)| *id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Visible pages referencing an item, ordered by id
    pub fn referencing_pages(&self, content_type: ContentType, item_id: ItemId) -> &[PageId] {
        self.references
            .get(&(content_type, item_id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
