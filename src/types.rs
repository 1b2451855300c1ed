pub type JournalId = u64;
pub type PageId = u64;
pub type ItemId = u64;

pub type HandlerResult<T> = Result<T, crate::http::ApiError>;
