pub mod access;
pub mod executor;
pub mod merger;
pub mod orchestrator;
pub mod popularity;
pub mod projector;
pub mod scope;

pub use access::AccessResolver;
pub use executor::{ScoredItem, TypedSearchExecutor};
pub use merger::RankedMerger;
pub use orchestrator::SearchOrchestrator;
pub use popularity::{MemoryPopularity, PopularQuery, QueryPopularity};
pub use projector::HitProjector;
pub use scope::SearchScope;
