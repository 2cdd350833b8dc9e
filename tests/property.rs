//! Property-based tests using proptest.
//!
//! These pin down the scorer, ranker, and keyword-derivation invariants for
//! randomly generated inputs rather than hand-picked examples.

use proptest::prelude::*;
use talpa::{
    derive_keywords, page_bounds, paginate, rank_candidates, score, unique_tokens, Document,
    DocumentId, ImportanceTokens, JaroWinkler, ScoredCandidate, SnowballTokenizer,
    IMPORTANCE_IMPACT,
};

// ============================================================================
// STRATEGIES
// ============================================================================

/// Generate random word-like tokens.
fn token_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}").unwrap()
}

/// Generate a token set (possibly with duplicates).
fn token_set_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(token_strategy(), 0..8)
}

/// Generate random document text (multiple words).
fn document_text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::string::string_regex("[a-z]{2,8}").unwrap(), 1..10)
        .prop_map(|words| words.join(" "))
}

/// Generate relevance values with plenty of collisions, so stability under
/// ties actually gets exercised.
fn relevance_strategy() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![0.0, 0.5, 1.0, 1.0, 2.0, 2.0, 5.0])
}

fn candidates_strategy() -> impl Strategy<Value = Vec<ScoredCandidate>> {
    prop::collection::vec(relevance_strategy(), 0..20).prop_map(|scores| {
        scores
            .into_iter()
            .enumerate()
            .map(|(index, relevance)| ScoredCandidate {
                id: DocumentId::new(format!("doc-{index}")),
                relevance,
            })
            .collect()
    })
}

// ============================================================================
// SCORER PROPERTIES
// ============================================================================

proptest! {
    /// Property: relevance is never negative.
    #[test]
    fn prop_score_is_non_negative(
        query in token_set_strategy(),
        document in token_set_strategy(),
    ) {
        let relevance = score(&query, &document, &[], &JaroWinkler);
        prop_assert!(relevance >= 0.0);
    }

    /// Property: an empty query scores zero against any document.
    #[test]
    fn prop_empty_query_scores_zero(document in token_set_strategy()) {
        prop_assert_eq!(score(&[], &document, &[], &JaroWinkler), 0.0);
    }

    /// Property: an exact importance match adds exactly impact * multiplier.
    #[test]
    fn prop_importance_match_strictly_increases_score(
        document in token_set_strategy(),
        token in token_strategy(),
        multiplier in 0.5f64..4.0,
    ) {
        let query = vec![token.clone()];
        let without = score(&query, &document, &[], &JaroWinkler);
        let importance = [ImportanceTokens {
            tokens: vec![token],
            multiplier,
        }];
        let with = score(&query, &document, &importance, &JaroWinkler);

        prop_assert!(with > without);
        let bonus = IMPORTANCE_IMPACT * multiplier;
        prop_assert!((with - without - bonus).abs() < 1e-9);
    }

    /// Property: scoring is deterministic for a deterministic metric.
    #[test]
    fn prop_score_is_deterministic(
        query in token_set_strategy(),
        document in token_set_strategy(),
    ) {
        let first = score(&query, &document, &[], &JaroWinkler);
        let second = score(&query, &document, &[], &JaroWinkler);
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// RANKING AND PAGINATION PROPERTIES
// ============================================================================

proptest! {
    /// Property: ranking orders by non-increasing relevance.
    #[test]
    fn prop_ranked_scores_are_non_increasing(mut candidates in candidates_strategy()) {
        rank_candidates(&mut candidates);
        for pair in candidates.windows(2) {
            prop_assert!(pair[0].relevance >= pair[1].relevance);
        }
    }

    /// Property: ranking the same input twice yields the same order,
    /// ties included.
    #[test]
    fn prop_ranking_is_stable_and_repeatable(candidates in candidates_strategy()) {
        let mut first = candidates.clone();
        let mut second = candidates;
        rank_candidates(&mut first);
        rank_candidates(&mut second);
        prop_assert_eq!(first, second);
    }

    /// Property: candidates with equal relevance keep their input order.
    #[test]
    fn prop_ties_preserve_input_order(candidates in candidates_strategy()) {
        let mut ranked = candidates.clone();
        rank_candidates(&mut ranked);

        let original_index = |id: &DocumentId| {
            candidates.iter().position(|c| &c.id == id).unwrap()
        };
        for pair in ranked.windows(2) {
            if pair[0].relevance == pair[1].relevance {
                prop_assert!(original_index(&pair[0].id) < original_index(&pair[1].id));
            }
        }
    }

    /// Property: page bounds are always within range and never panic.
    #[test]
    fn prop_page_bounds_are_clamped(
        total in 0usize..64,
        skip in proptest::option::of(0usize..128),
        limit in proptest::option::of(0usize..128),
    ) {
        let (start, end) = page_bounds(total, skip, limit);
        prop_assert!(start <= end);
        prop_assert!(end <= total);
        if let Some(skip) = skip {
            if skip >= total {
                prop_assert_eq!(start, end);
            }
        }
    }

    /// Property: the page is a contiguous slice of the input.
    #[test]
    fn prop_page_is_a_slice_of_the_input(
        items in prop::collection::vec(0u32..1000, 0..40),
        skip in proptest::option::of(0usize..60),
        limit in proptest::option::of(0usize..60),
    ) {
        let page = paginate(&items, skip, limit);
        let (start, end) = page_bounds(items.len(), skip, limit);
        prop_assert_eq!(page, &items[start..end]);
    }
}

// ============================================================================
// KEYWORD DERIVATION PROPERTIES
// ============================================================================

proptest! {
    /// Property: deriving twice from an unchanged document yields the same
    /// token sequence.
    #[test]
    fn prop_derivation_is_idempotent(
        title in document_text_strategy(),
        body in document_text_strategy(),
    ) {
        let tokenizer = SnowballTokenizer::english();
        let fields = vec!["title".to_string(), "body".to_string()];
        let document = Document::new("d")
            .with_text("title", title)
            .with_text("body", body);

        let first = derive_keywords(&document, &fields, &tokenizer);
        let second = derive_keywords(&document, &fields, &tokenizer);
        prop_assert_eq!(first, second);
    }

    /// Property: derived keyword sets contain no duplicates.
    #[test]
    fn prop_derived_keywords_are_unique(text in document_text_strategy()) {
        let tokenizer = SnowballTokenizer::english();
        let fields = vec!["body".to_string()];
        let document = Document::new("d").with_text("body", text);

        let keywords = derive_keywords(&document, &fields, &tokenizer);
        let mut deduped = keywords.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), keywords.len());
    }

    /// Property: dedup keeps the first occurrence of each token, in order.
    #[test]
    fn prop_unique_tokens_preserve_first_occurrence(tokens in token_set_strategy()) {
        let deduped = unique_tokens(tokens.clone());

        // Every token survives exactly once...
        for token in &tokens {
            prop_assert_eq!(deduped.iter().filter(|t| *t == token).count(), 1);
        }
        // ...and in order of first appearance.
        let firsts: Vec<usize> = deduped
            .iter()
            .map(|t| tokens.iter().position(|x| x == t).unwrap())
            .collect();
        let mut sorted = firsts.clone();
        sorted.sort_unstable();
        prop_assert_eq!(firsts, sorted);
    }
}
