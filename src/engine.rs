// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query orchestration: the piece that ties tokenizer, scorer, ranker, and
//! store together.
//!
//! A search makes exactly two storage round-trips. The coarse fetch pulls
//! every candidate sharing at least one token with the query, projected down
//! to identity + keywords + importance fields. After scoring, ranking, and
//! slicing, the page re-fetch pulls full documents for the surviving
//! identities only - a second fetch does not preserve the first fetch's
//! ordering by construction, so the computed order is re-applied before the
//! page is returned.
//!
//! Scoring across candidates has no cross-document dependency, so it runs
//! on rayon when the `parallel` feature is on. Bulk reindexing fans out one
//! recompute-and-save per document and joins on all of them; a single failed
//! save is recorded and logged, never fatal to the batch.

use crate::analyze::{stemmer_by_name, unique_tokens, Tokenizer};
use crate::config::{EngineConfig, SearchRequest};
use crate::distance::{metric_by_name, DistanceMetric};
use crate::error::{ReindexFailure, ReindexReport, SearchError};
use crate::keywords::{derive_keywords, fields_changed};
use crate::ranking::{paginate, rank_candidates, ScoredCandidate};
use crate::scoring::{score, ImportanceTokens};
use crate::storage::{Condition, DocumentStore, FindOptions, Projection};
use crate::types::{Document, DocumentId, FieldValue, ImportanceWeight, ResultPage, SearchHit};
use std::collections::HashMap;
use tracing::{debug, warn};

/// The relevance search engine over a storage collaborator.
///
/// Holds no per-query state: every search is a pure computation between two
/// store round-trips, so one engine serves concurrent callers.
pub struct SearchEngine<S> {
    store: S,
    config: EngineConfig,
    tokenizer: Box<dyn Tokenizer>,
    metric: Box<dyn DistanceMetric>,
}

impl<S: DocumentStore> SearchEngine<S> {
    /// Build an engine with the configured (named) stemmer and metric.
    pub fn new(store: S, config: EngineConfig) -> Result<Self, SearchError> {
        let tokenizer = stemmer_by_name(&config.stemmer).ok_or_else(|| {
            SearchError::Configuration(format!("unknown stemmer '{}'", config.stemmer))
        })?;
        let metric = metric_by_name(&config.distance).ok_or_else(|| {
            SearchError::Configuration(format!("unknown distance metric '{}'", config.distance))
        })?;
        Self::with_components(store, config, Box::new(tokenizer), metric)
    }

    /// Build an engine with caller-supplied tokenizer and metric
    /// implementations, bypassing the name registries.
    pub fn with_components(
        store: S,
        config: EngineConfig,
        tokenizer: Box<dyn Tokenizer>,
        metric: Box<dyn DistanceMetric>,
    ) -> Result<Self, SearchError> {
        if config.fields.is_empty() {
            return Err(SearchError::Configuration(
                "at least one searchable field is required".to_string(),
            ));
        }
        Ok(SearchEngine {
            store,
            config,
            tokenizer,
            metric,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Pure keyword derivation for a document; no mutation, no persistence.
    pub fn process_keywords(&self, document: &Document) -> Vec<String> {
        derive_keywords(document, &self.config.fields, self.tokenizer.as_ref())
    }

    /// Recompute the document's keyword set in place. Does not persist.
    pub fn update_keywords(&self, document: &mut Document) {
        let keywords = self.process_keywords(document);
        document.set_keywords(&self.config.keywords_path, keywords);
    }

    /// Save lifecycle hook: re-derive keywords when the document is new or
    /// any searchable field changed since the stored copy, then persist.
    pub fn save_document(&self, mut document: Document) -> Result<(), SearchError> {
        let stored = self.store.get(&document.id)?;
        let changed = match &stored {
            None => true,
            Some(previous) => fields_changed(&document, previous, &self.config.fields),
        };
        if changed {
            self.update_keywords(&mut document);
        }
        self.store.save(document)?;
        Ok(())
    }

    /// Execute a search: tokenize, coarse-filter, score, rank, paginate,
    /// and re-fetch the final page.
    pub fn search(&self, request: &SearchRequest) -> Result<ResultPage, SearchError> {
        if request.query.trim().is_empty() {
            return Err(SearchError::Configuration(
                "a query is required".to_string(),
            ));
        }

        let query_tokens = unique_tokens(self.tokenizer.tokenize_and_stem(&request.query));
        debug!(query = %request.query, tokens = query_tokens.len(), "query tokenized");

        // Coarse fetch: any keyword overlap, projected to identity +
        // keywords + importance fields. Caller conditions apply here too.
        let mut conditions = request.options.conditions.clone();
        conditions.push(Condition::AnyOf {
            path: self.config.keywords_path.clone(),
            values: query_tokens.clone(),
        });

        let mut coarse_fields = vec![self.config.keywords_path.clone()];
        coarse_fields.extend(request.importance.iter().map(|w| w.field.clone()));

        let coarse_options = FindOptions {
            sort: request.options.sort.clone(),
            populate: Vec::new(),
        };
        let candidates = self.store.find(
            &conditions,
            &Projection::fields(coarse_fields),
            &coarse_options,
        )?;
        let total_count = candidates.len();
        debug!(candidates = total_count, "coarse fetch complete");

        let mut scored = self.score_candidates(&candidates, &query_tokens, &request.importance);

        // An explicit sort defers ordering to the store; relevance is still
        // attached to each hit but does not affect order.
        let explicit_sort = request.options.sort.is_some();
        if !explicit_sort {
            rank_candidates(&mut scored);
        }

        let page = paginate(&scored, request.options.skip, request.options.limit);
        if page.is_empty() {
            return Ok(ResultPage {
                results: Vec::new(),
                total_count,
            });
        }

        // Page re-fetch: full (or caller-projected) documents for the
        // surviving identities only.
        let page_ids: Vec<DocumentId> = page.iter().map(|c| c.id.clone()).collect();
        let relevance_by_id: HashMap<&DocumentId, f64> =
            page.iter().map(|c| (&c.id, c.relevance)).collect();

        let mut refetch_conditions = request.options.conditions.clone();
        refetch_conditions.push(Condition::IdIn(page_ids.clone()));
        let refetch_projection = match &request.fields {
            Some(fields) => Projection::fields(fields.iter().cloned()),
            None => Projection::all(),
        };
        let refetch_options = FindOptions {
            sort: request.options.sort.clone(),
            populate: request.options.populate.clone(),
        };
        let mut documents =
            self.store
                .find(&refetch_conditions, &refetch_projection, &refetch_options)?;

        // Re-apply the computed order: the ranked page order, or (with an
        // explicit sort) the store's native order of the re-fetch.
        if !explicit_sort {
            let position: HashMap<&DocumentId, usize> = page_ids
                .iter()
                .enumerate()
                .map(|(index, id)| (id, index))
                .collect();
            documents.sort_by_key(|document| {
                position.get(&document.id).copied().unwrap_or(usize::MAX)
            });
        }

        let results = documents
            .into_iter()
            .map(|document| {
                let relevance = relevance_by_id.get(&document.id).copied().unwrap_or(0.0);
                SearchHit {
                    document,
                    relevance,
                }
            })
            .collect();

        Ok(ResultPage {
            results,
            total_count,
        })
    }

    /// Recompute and save the keyword set of every stored document.
    ///
    /// Per-item save failures are logged and collected into the report; the
    /// batch always runs to completion.
    pub fn set_keywords(&self) -> Result<ReindexReport, SearchError> {
        let documents = self
            .store
            .find(&[], &Projection::all(), &FindOptions::default())?;
        Ok(self.reindex(documents))
    }

    fn reindex_one(&self, mut document: Document) -> Option<ReindexFailure> {
        self.update_keywords(&mut document);
        let id = document.id.clone();
        match self.store.save(document) {
            Ok(()) => None,
            Err(error) => {
                warn!(document = %id, %error, "keyword reindex save failed");
                Some(ReindexFailure { id, error })
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn reindex(&self, documents: Vec<Document>) -> ReindexReport {
        use rayon::prelude::*;
        let total = documents.len();
        let failures: Vec<ReindexFailure> = documents
            .into_par_iter()
            .filter_map(|document| self.reindex_one(document))
            .collect();
        ReindexReport {
            reindexed: total - failures.len(),
            failures,
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn reindex(&self, documents: Vec<Document>) -> ReindexReport {
        let total = documents.len();
        let failures: Vec<ReindexFailure> = documents
            .into_iter()
            .filter_map(|document| self.reindex_one(document))
            .collect();
        ReindexReport {
            reindexed: total - failures.len(),
            failures,
        }
    }

    fn score_candidate(
        &self,
        document: &Document,
        query_tokens: &[String],
        importance: &[ImportanceWeight],
    ) -> ScoredCandidate {
        let importance_tokens: Vec<ImportanceTokens> = importance
            .iter()
            .map(|weight| ImportanceTokens {
                tokens: self.field_tokens(document, &weight.field),
                multiplier: weight.multiplier,
            })
            .collect();

        let relevance = score(
            query_tokens,
            document.keywords(&self.config.keywords_path),
            &importance_tokens,
            self.metric.as_ref(),
        );
        ScoredCandidate {
            id: document.id.clone(),
            relevance,
        }
    }

    /// A field's own deduplicated token set, for importance matching.
    fn field_tokens(&self, document: &Document, field: &str) -> Vec<String> {
        document
            .field(field)
            .and_then(FieldValue::searchable_text)
            .map(|text| unique_tokens(self.tokenizer.tokenize_and_stem(&text)))
            .unwrap_or_default()
    }

    #[cfg(feature = "parallel")]
    fn score_candidates(
        &self,
        candidates: &[Document],
        query_tokens: &[String],
        importance: &[ImportanceWeight],
    ) -> Vec<ScoredCandidate> {
        use rayon::prelude::*;
        candidates
            .par_iter()
            .map(|document| self.score_candidate(document, query_tokens, importance))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn score_candidates(
        &self,
        candidates: &[Document],
        query_tokens: &[String],
        importance: &[ImportanceWeight],
    ) -> Vec<ScoredCandidate> {
        candidates
            .iter()
            .map(|document| self.score_candidate(document, query_tokens, importance))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn engine() -> SearchEngine<MemoryStore> {
        SearchEngine::new(
            MemoryStore::new(),
            EngineConfig::new(["title", "body"]),
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_field_list() {
        let error = SearchEngine::new(MemoryStore::new(), EngineConfig::new(Vec::<String>::new()))
            .err()
            .unwrap();
        assert!(matches!(error, SearchError::Configuration(_)));
    }

    #[test]
    fn rejects_unknown_algorithm_names() {
        let mut config = EngineConfig::new(["title"]);
        config.stemmer = "klingon".to_string();
        assert!(SearchEngine::new(MemoryStore::new(), config).is_err());

        let mut config = EngineConfig::new(["title"]);
        config.distance = "cosine".to_string();
        assert!(SearchEngine::new(MemoryStore::new(), config).is_err());
    }

    #[test]
    fn blank_query_is_a_configuration_error() {
        let engine = engine();
        let error = engine.search(&SearchRequest::new("   ")).err().unwrap();
        assert!(matches!(error, SearchError::Configuration(_)));
    }

    #[test]
    fn save_hook_derives_keywords_for_new_documents() {
        let engine = engine();
        engine
            .save_document(Document::new("d1").with_text("title", "Running Shoes"))
            .unwrap();
        let saved = engine.store().get(&DocumentId::new("d1")).unwrap().unwrap();
        assert_eq!(saved.keywords("_keywords"), ["run", "shoe"]);
    }

    #[test]
    fn save_hook_skips_rederivation_when_fields_unchanged() {
        let engine = engine();
        engine
            .save_document(Document::new("d1").with_text("title", "Running Shoes"))
            .unwrap();

        // Re-save with a stale keyword set but identical searchable fields:
        // the hook must leave keywords alone.
        let mut stale = engine.store().get(&DocumentId::new("d1")).unwrap().unwrap();
        stale.set_keywords("_keywords", vec!["stale".to_string()]);
        engine.save_document(stale).unwrap();

        let saved = engine.store().get(&DocumentId::new("d1")).unwrap().unwrap();
        assert_eq!(saved.keywords("_keywords"), ["stale"]);
    }

    #[test]
    fn save_hook_rederives_on_searchable_change() {
        let engine = engine();
        engine
            .save_document(Document::new("d1").with_text("title", "Running Shoes"))
            .unwrap();

        let mut changed = engine.store().get(&DocumentId::new("d1")).unwrap().unwrap();
        changed.set_field("title", FieldValue::Text("Trail Boots".to_string()));
        engine.save_document(changed).unwrap();

        let saved = engine.store().get(&DocumentId::new("d1")).unwrap().unwrap();
        assert_eq!(saved.keywords("_keywords"), ["trail", "boot"]);
    }
}
