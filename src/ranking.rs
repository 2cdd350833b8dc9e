// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Candidate ordering and result slicing.
//!
//! Ranking sorts scored candidates by descending relevance with a *stable*
//! sort: candidates with equal scores keep their input order. The reference
//! store enumerates candidates by ascending identity, which makes the full
//! ordering deterministic there; with an arbitrary store, only stability
//! relative to its enumeration order is promised.
//!
//! Pagination clamps instead of failing: a skip past the end yields an empty
//! slice, a limit past the end yields the remainder, and a limit of zero
//! yields an empty page. Out-of-range paging is a normal request, never an
//! error.

use crate::types::DocumentId;
use std::cmp::Ordering;

/// Transient pairing of a document identity with its computed relevance,
/// alive for one ranking operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub id: DocumentId,
    pub relevance: f64,
}

/// Sort candidates by descending relevance, stable on ties.
pub fn rank_candidates(candidates: &mut [ScoredCandidate]) {
    // Scores come from summed similarities and finite multipliers, so a NaN
    // can't appear here; Equal is the safe fallback that keeps the sort stable.
    candidates.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(Ordering::Equal)
    });
}

/// Clamped `[start, end)` bounds for a page over `total` items.
///
/// `skip` defaults to 0; `limit` defaults to everything after the skip.
pub fn page_bounds(total: usize, skip: Option<usize>, limit: Option<usize>) -> (usize, usize) {
    let start = skip.unwrap_or(0).min(total);
    let requested = limit.unwrap_or(total - start);
    let end = start.saturating_add(requested).min(total);
    (start, end)
}

/// The page slice of `items` under clamped skip/limit semantics.
pub fn paginate<T>(items: &[T], skip: Option<usize>, limit: Option<usize>) -> &[T] {
    let (start, end) = page_bounds(items.len(), skip, limit);
    &items[start..end]
}
