//! Fuzzy keyword relevance ranking for document stores.
//!
//! Documents carry a derived keyword set (deduplicated stems over their
//! searchable fields). A query is tokenized the same way, candidates sharing
//! at least one token are pulled from the store, each candidate is scored by
//! fuzzy token similarity plus configurable field-importance bonuses, and
//! the ranked page is re-fetched in full.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌─────────────┐    ┌────────────┐
//! │ analyze.rs │───▶│ keywords.rs │    │distance.rs │
//! │ (Tokenizer,│    │ (derive_    │    │ (Distance  │
//! │  stemming) │    │  keywords)  │    │  Metric)   │
//! └────────────┘    └─────────────┘    └────────────┘
//!        │                 │                  │
//!        ▼                 ▼                  ▼
//! ┌─────────────────────────────────────────────────┐
//! │                   engine.rs                     │
//! │   (search, set_keywords, save_document)         │
//! └─────────────────────────────────────────────────┘
//!        │                 │                  │
//!        ▼                 ▼                  ▼
//! ┌────────────┐    ┌─────────────┐    ┌────────────┐
//! │ scoring.rs │    │ ranking.rs  │    │ storage.rs │
//! │ (score)    │    │ (rank,      │    │ (Document  │
//! │            │    │  paginate)  │    │  Store)    │
//! └────────────┘    └─────────────┘    └────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use talpa::{Document, EngineConfig, MemoryStore, SearchEngine, SearchRequest};
//!
//! let engine = SearchEngine::new(MemoryStore::new(), EngineConfig::new(["title", "body"]))?;
//! engine.save_document(Document::new("d1").with_text("title", "Running Shoes"))?;
//!
//! let page = engine.search(&SearchRequest::new("running"))?;
//! assert_eq!(page.total_count, 1);
//! ```

// Module declarations
mod analyze;
mod config;
mod distance;
mod engine;
mod error;
mod keywords;
mod ranking;
mod scoring;
mod storage;
mod types;

// Re-exports for public API
pub use analyze::{normalize, stemmer_by_name, unique_tokens, SnowballTokenizer, Tokenizer};
pub use config::{
    EngineConfig, SearchOptions, SearchRequest, DEFAULT_DISTANCE, DEFAULT_KEYWORDS_PATH,
    DEFAULT_RELEVANCE_PATH, DEFAULT_STEMMER,
};
pub use distance::{
    metric_by_name, DistanceMetric, Jaro, JaroWinkler, NormalizedLevenshtein, SorensenDice,
};
pub use engine::SearchEngine;
pub use error::{ReindexFailure, ReindexReport, SearchError, StorageError};
pub use keywords::{derive_keywords, fields_changed, searchable_text};
pub use ranking::{page_bounds, paginate, rank_candidates, ScoredCandidate};
pub use scoring::{score, ImportanceTokens, IMPORTANCE_IMPACT, SIMILARITY_THRESHOLD};
pub use storage::{Condition, DocumentStore, FindOptions, MemoryStore, Projection};
pub use types::{
    Document, DocumentId, FieldValue, ImportanceWeight, Populate, ResultPage, SearchHit,
    SortOrder, SortSpec,
};
