//! Statement search: query normalization and grouped, ranked matching.

pub mod engine;
pub mod normalize;

pub use engine::{DEFAULT_ENTITY, DEFAULT_PLACE, SearchEngine, SearchResult};
pub use normalize::{NormalizedQuery, canonical_id, normalize};
