//! Engine and per-query configuration.
//!
//! Everything a caller can tune lives in two structs with documented
//! defaults: [`EngineConfig`] fixes the schema-level choices (searchable
//! fields, storage paths, algorithm names) at engine construction, and
//! [`SearchRequest`] carries the per-query knobs. Both are validated at the
//! orchestration boundary, not deep inside the pipeline.

use crate::storage::Condition;
use crate::types::{ImportanceWeight, Populate, SortSpec};
use serde::{Deserialize, Serialize};

/// Storage field name for the derived keyword set.
pub const DEFAULT_KEYWORDS_PATH: &str = "_keywords";

/// Field name under which relevance is reported when hits are flattened
/// into plain records (CLI JSON output, exports).
pub const DEFAULT_RELEVANCE_PATH: &str = "_relevance";

/// Default stemming algorithm name.
pub const DEFAULT_STEMMER: &str = "english";

/// Default distance metric name.
pub const DEFAULT_DISTANCE: &str = "jaro-winkler";

/// Schema-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Searchable field names, in declaration order. Must be non-empty;
    /// declaration order is the concatenation order for keyword derivation.
    pub fields: Vec<String>,

    /// Storage field name for the derived keyword set.
    #[serde(default = "default_keywords_path")]
    pub keywords_path: String,

    /// Field name for relevance in flattened output records.
    #[serde(default = "default_relevance_path")]
    pub relevance_path: String,

    /// Stemming algorithm, by name (see `analyze::stemmer_by_name`).
    #[serde(default = "default_stemmer")]
    pub stemmer: String,

    /// Distance metric, by name (see `distance::metric_by_name`).
    #[serde(default = "default_distance")]
    pub distance: String,
}

impl EngineConfig {
    /// Configuration with the given searchable fields and all defaults.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EngineConfig {
            fields: fields.into_iter().map(Into::into).collect(),
            keywords_path: default_keywords_path(),
            relevance_path: default_relevance_path(),
            stemmer: default_stemmer(),
            distance: default_distance(),
        }
    }
}

fn default_keywords_path() -> String {
    DEFAULT_KEYWORDS_PATH.to_string()
}

fn default_relevance_path() -> String {
    DEFAULT_RELEVANCE_PATH.to_string()
}

fn default_stemmer() -> String {
    DEFAULT_STEMMER.to_string()
}

fn default_distance() -> String {
    DEFAULT_DISTANCE.to_string()
}

/// Per-query retrieval options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Extra filter conditions ANDed onto the coarse keyword filter and the
    /// final page re-fetch.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Explicit ordering, honored natively by the store. When set, ranking
    /// by relevance is skipped.
    #[serde(default)]
    pub sort: Option<SortSpec>,

    /// Candidates to skip before the page. Defaults to 0; values past the
    /// end clamp to an empty page.
    #[serde(default)]
    pub skip: Option<usize>,

    /// Page size. Defaults to everything after the skip; `Some(0)` is a
    /// real limit and yields an empty page.
    #[serde(default)]
    pub limit: Option<usize>,

    /// Join directives applied to the final page.
    #[serde(default)]
    pub populate: Vec<Populate>,
}

/// One search call: query text plus optional configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query. Required; a blank query is a configuration error.
    pub query: String,

    /// Result projection for the final page; `None` returns full documents.
    #[serde(default)]
    pub fields: Option<Vec<String>>,

    #[serde(default)]
    pub options: SearchOptions,

    /// Fields whose exact token overlap with the query is amplified.
    #[serde(default)]
    pub importance: Vec<ImportanceWeight>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        SearchRequest {
            query: query.into(),
            fields: None,
            options: SearchOptions::default(),
            importance: Vec::new(),
        }
    }

    /// Builder-style result projection.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Builder-style retrieval options.
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Builder-style importance weights.
    pub fn with_importance<I>(mut self, importance: I) -> Self
    where
        I: IntoIterator<Item = ImportanceWeight>,
    {
        self.importance = importance.into_iter().collect();
        self
    }
}
