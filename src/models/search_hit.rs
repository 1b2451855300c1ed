use serde::{Deserialize, Serialize};
use md5::{Digest, Md5};

use crate::types::{ItemId, JournalId, PageId};

/// Kind of page fragment a hit points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
pub enum BlockType {
    #[serde(rename = "rich_text")]
    #[strum(serialize = "rich_text")]
    RichText,
    #[serde(rename = "pdf")]
    #[strum(serialize = "pdf")]
    Pdf,
    #[serde(rename = "image")]
    #[strum(serialize = "image")]
    Image,
    #[serde(rename = "xblock_video")]
    #[strum(serialize = "xblock_video")]
    XblockVideo,
}

/// Anchor the page renderer places in front of a block, `{block_type}-{md5 of the id}`.
///
/// Rich text hits anchor to the whole page and get an empty id.
pub fn span_id(block_type: BlockType, block_id: ItemId) -> String {
    if block_type == BlockType::RichText {
        return String::new();
    }

    let digest = Md5::digest(block_id.to_string().as_bytes());
    format!("{}-{}", block_type, hex::encode(digest))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    /// Page the match was found on
    pub page_id: PageId,
    pub page_title: String,
    pub page_path: String,
    /// Titles of the live ancestor pages below the about page, root first
    pub breadcrumbs: Vec<String>,

    pub journal_about_page_id: PageId,
    pub journal_id: JournalId,
    pub journal_name: String,

    /// Matched object, equal to `page_id` for rich text hits
    pub block_id: ItemId,
    pub block_title: String,
    pub block_type: BlockType,

    /// Excerpts with matches wrapped in `<b>` tags
    pub highlights: Vec<String>,
    /// Relevance as reported by the scoring oracle
    pub score: f64,
    pub span_id: String,
}
