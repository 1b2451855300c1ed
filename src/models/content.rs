use serde::{Deserialize, Serialize};

use crate::{
    models::BlockType,
    types::{ItemId, JournalId, PageId},
};

/// Searchable content collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContentType {
    PageBody,
    Document,
    Image,
    Video,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::PageBody,
        ContentType::Document,
        ContentType::Image,
        ContentType::Video,
    ];

    pub fn block_type(&self) -> BlockType {
        match self {
            ContentType::PageBody => BlockType::RichText,
            ContentType::Document => BlockType::Pdf,
            ContentType::Image => BlockType::Image,
            ContentType::Video => BlockType::XblockVideo,
        }
    }
}

/// Root page of a journal, the boundary of a search scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutPage {
    pub id: PageId,
    pub journal_id: JournalId,
    /// Also used as the journal display name
    pub title: String,
    pub url_path: String,
    #[serde(default = "default_true")]
    pub live: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub id: PageId,
    /// Parent page, either another page or the journal's about page
    pub parent_id: Option<PageId>,
    pub title: String,
    pub url_path: String,
    #[serde(default = "default_true")]
    pub live: bool,
    #[serde(default = "default_true")]
    pub public: bool,

    pub sub_title: String,
    pub author: String,
    pub search_description: String,
    /// Plain text of the rendered body
    pub body: String,

    pub documents: Vec<ItemId>,
    pub images: Vec<ItemId>,
    pub videos: Vec<ItemId>,
}

impl Page {
    pub fn references(&self, content_type: ContentType) -> &[ItemId] {
        match content_type {
            ContentType::PageBody => &[],
            ContentType::Document => &self.documents,
            ContentType::Image => &self.images,
            ContentType::Video => &self.videos,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub id: ItemId,
    pub title: String,
    /// Text extracted from the attachment
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub id: ItemId,
    pub title: String,
    pub caption: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub id: ItemId,
    pub display_name: String,
    pub transcript: String,
    pub tags: Vec<String>,
}

/// Anything a typed search can match
#[derive(Debug, Clone)]
pub enum ContentItem {
    Page(Page),
    Document(Document),
    Image(Image),
    Video(Video),
}

impl ContentItem {
    pub fn id(&self) -> ItemId {
        match self {
            ContentItem::Page(page) => page.id,
            ContentItem::Document(document) => document.id,
            ContentItem::Image(image) => image.id,
            ContentItem::Video(video) => video.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentItem::Page(page) => &page.title,
            ContentItem::Document(document) => &document.title,
            ContentItem::Image(image) => &image.title,
            ContentItem::Video(video) => &video.display_name,
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            ContentItem::Page(_) => ContentType::PageBody,
            ContentItem::Document(_) => ContentType::Document,
            ContentItem::Image(_) => ContentType::Image,
            ContentItem::Video(_) => ContentType::Video,
        }
    }

    pub fn block_type(&self) -> BlockType {
        self.content_type().block_type()
    }

    /// `(field name, text)` pairs fed to the scoring oracle
    pub fn searchable_fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            ContentItem::Page(page) => vec![
                ("title", page.title.as_str()),
                ("sub_title", page.sub_title.as_str()),
                ("author", page.author.as_str()),
                ("search_description", page.search_description.as_str()),
                ("body", page.body.as_str()),
            ],
            ContentItem::Document(document) => vec![
                ("title", document.title.as_str()),
                ("attachment.content", document.content.as_str()),
            ],
            ContentItem::Image(image) => vec![
                ("title", image.title.as_str()),
                ("caption", image.caption.as_str()),
            ],
            ContentItem::Video(video) => {
                let mut fields = vec![
                    ("display_name", video.display_name.as_str()),
                    ("transcript", video.transcript.as_str()),
                ];
                fields.extend(video.tags.iter().map(|tag| ("tags.name", tag.as_str())));
                fields
            }
        }
    }
}

fn default_true() -> bool {
    true
}
