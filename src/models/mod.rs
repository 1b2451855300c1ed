pub mod content;
pub mod identity;
pub mod query;
pub mod results;
pub mod search_hit;

pub use content::{AboutPage, ContentItem, ContentType, Document, Image, Page, Video};
pub use identity::{AccessGrant, Identity};
pub use query::{Operator, SearchRequest, TypeFilter};
pub use results::{SearchMetaData, SearchResults};
pub use search_hit::{BlockType, SearchHit, span_id};
