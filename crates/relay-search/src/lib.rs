//! Best-effort web context lookups for grounding chat answers.

pub mod aggregator;
pub mod duckduckgo;
pub mod error;
pub mod types;
pub mod wikipedia;

pub use aggregator::{SearchAggregator, SearchConfig};
pub use error::{Result, SearchError};
pub use types::{EncyclopediaSummary, InstantAnswer, RelatedLink, SearchResult};
pub use wikipedia::EncyclopediaEndpoint;
