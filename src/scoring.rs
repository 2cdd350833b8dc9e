// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind relevance ranking.
//!
//! Each query token accumulates a contribution, and the document's relevance
//! is the sum over query tokens. A contribution has two parts:
//!
//! - **Fuzzy base**: every document token whose similarity to the query
//!   token exceeds [`SIMILARITY_THRESHOLD`] adds that similarity. All
//!   sufficiently similar tokens count, not just the best match - a document
//!   repeating a concept under near-duplicate stems scores higher, which is
//!   the intended behavior, not an accident.
//! - **Importance bonus**: for each importance-weighted field whose own
//!   token set contains the query token *exactly* (string equality, never
//!   fuzzy), add [`IMPORTANCE_IMPACT`] times that field's multiplier.
//!
//! The total is an unbounded additive signal. It is comparable only between
//! candidates of the same ranking operation - never across queries, and
//! never across datasets. There is deliberately no normalization by document
//! or query length.
//!
//! # Key Invariants
//!
//! - `score(q, d, i) >= 0` for all inputs (similarities and multipliers are
//!   non-negative).
//! - `score([], d, i) == 0` - no query tokens, no contributions.
//! - Deterministic for a deterministic metric.

use crate::distance::DistanceMetric;

/// Minimum similarity for a document token to contribute to the fuzzy base.
///
/// Sits on the metric's `[0, 1]` scale. Below this, a pair is noise;
/// above it, the raw similarity is summed.
pub const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Fixed impact of one exact importance-field match, before the field's
/// multiplier is applied.
///
/// Large relative to the fuzzy base (each fuzzy pair adds at most 1.0), so
/// an importance match dominates fuzzy noise even at multiplier 1.
pub const IMPORTANCE_IMPACT: f64 = 50.0;

/// One importance-weighted field, resolved to its own token set.
///
/// Transient: built per candidate during a ranking operation and discarded
/// with it.
#[derive(Debug, Clone)]
pub struct ImportanceTokens {
    /// The field's own tokenized content (deduplicated stems).
    pub tokens: Vec<String>,
    /// Multiplier applied to [`IMPORTANCE_IMPACT`] on an exact match.
    pub multiplier: f64,
}

/// Relevance of a document's token set against the query's token set.
pub fn score(
    query_tokens: &[String],
    document_tokens: &[String],
    importance: &[ImportanceTokens],
    metric: &dyn DistanceMetric,
) -> f64 {
    query_tokens
        .iter()
        .map(|token| token_relevance(token, document_tokens, importance, metric))
        .sum()
}

/// Contribution of a single query token.
fn token_relevance(
    token: &str,
    document_tokens: &[String],
    importance: &[ImportanceTokens],
    metric: &dyn DistanceMetric,
) -> f64 {
    let mut contribution = 0.0;

    for document_token in document_tokens {
        let similarity = metric.similarity(token, document_token);
        if similarity > SIMILARITY_THRESHOLD {
            contribution += similarity;
        }
    }

    // Exact membership only - fuzzy matching stops at the base contribution.
    for field in importance {
        if field.tokens.iter().any(|field_token| field_token == token) {
            contribution += IMPORTANCE_IMPACT * field.multiplier;
        }
    }

    contribution
}
