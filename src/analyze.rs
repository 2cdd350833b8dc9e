// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text analysis: normalization, tokenization, and stemming.
//!
//! The [`Tokenizer`] trait is the pluggable seam - the engine only ever sees
//! ordered stems. The bundled implementation normalizes (lowercase, strip
//! diacritics, collapse whitespace), splits on non-alphanumeric boundaries,
//! drops English stopwords, and stems with a Snowball algorithm. Swap in
//! your own tokenizer when that pipeline doesn't fit.
//!
//! Stemmers are selected by name through [`stemmer_by_name`], so callers can
//! configure the algorithm without touching types.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// Turns raw text into an ordered sequence of normalized stems.
///
/// Duplicates are preserved; callers that need set semantics dedupe with
/// [`unique_tokens`], which keeps first-occurrence order.
pub trait Tokenizer: Send + Sync {
    fn tokenize_and_stem(&self, text: &str) -> Vec<String>;
}

/// Normalize a string for matching: lowercase, strip diacritics, and
/// collapse whitespace.
///
/// This lets fuzzy matching treat ASCII and accented spellings alike:
/// - "café" → "cafe"
/// - "naïve" → "naive"
///
/// # Algorithm (with unicode-normalization feature)
///
/// 1. NFD normalize (decompose characters into base + combining marks)
/// 2. Filter out combining marks (category Mn = Mark, Nonspacing)
/// 3. Lowercase
/// 4. Collapse whitespace
///
/// # Algorithm (without unicode-normalization)
///
/// 1. Lowercase only (assumes input is pre-normalized or ASCII)
/// 2. Collapse whitespace
#[cfg(feature = "unicode-normalization")]
pub fn normalize(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lightweight normalization without the unicode-normalization dependency.
/// Just lowercases and collapses whitespace.
#[cfg(not(feature = "unicode-normalization"))]
pub fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check if a character is a combining mark (diacritic).
///
/// Combining marks have Unicode category "Mn" (Mark, Nonspacing).
/// Examples: ́ (acute), ̄ (macron), ̣ (dot below)
#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{0C00}'..='\u{0C7F}' |  // Telugu (some combining marks)
        '\u{0900}'..='\u{097F}' |  // Devanagari (some combining marks)
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

// Function words that carry no keyword signal. Dropped before stemming so
// "the running fox" and "running fox" index identically.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "another", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "between", "both", "but", "by", "came", "can",
    "come", "could", "did", "do", "each", "for", "from", "get", "got", "had", "has", "have", "he",
    "her", "here", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "like",
    "make", "many", "me", "might", "more", "most", "much", "must", "my", "never", "now", "of",
    "on", "only", "or", "other", "our", "out", "over", "said", "same", "should", "since", "some",
    "still", "such", "take", "than", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "up", "very", "was", "way", "we",
    "well", "were", "what", "where", "which", "while", "who", "with", "would", "you", "your",
];

fn is_stopword(word: &str) -> bool {
    STOPWORDS.binary_search(&word).is_ok()
}

/// The bundled tokenizer: normalize, split, drop stopwords, Snowball-stem.
pub struct SnowballTokenizer {
    stemmer: Stemmer,
}

impl SnowballTokenizer {
    pub fn new(algorithm: Algorithm) -> Self {
        SnowballTokenizer {
            stemmer: Stemmer::create(algorithm),
        }
    }

    /// English (Porter-family) stemming, the default.
    pub fn english() -> Self {
        SnowballTokenizer::new(Algorithm::English)
    }
}

impl Tokenizer for SnowballTokenizer {
    fn tokenize_and_stem(&self, text: &str) -> Vec<String> {
        normalize(text)
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty() && !is_stopword(word))
            .map(|word| self.stemmer.stem(word).into_owned())
            .collect()
    }
}

/// Look up a stemming algorithm by configured name.
///
/// `"english"` (alias `"porter"`, the Porter-family Snowball stemmer) is the
/// default; the other entries cover the common Snowball languages. Returns
/// `None` for unrecognized names so the caller can reject the configuration.
pub fn stemmer_by_name(name: &str) -> Option<SnowballTokenizer> {
    let algorithm = match name {
        "english" | "porter" => Algorithm::English,
        "dutch" => Algorithm::Dutch,
        "french" => Algorithm::French,
        "german" => Algorithm::German,
        "italian" => Algorithm::Italian,
        "portuguese" => Algorithm::Portuguese,
        "russian" => Algorithm::Russian,
        "spanish" => Algorithm::Spanish,
        "swedish" => Algorithm::Swedish,
        _ => return None,
    };
    Some(SnowballTokenizer::new(algorithm))
}

/// Deduplicate tokens preserving first-occurrence order.
pub fn unique_tokens(tokens: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(tokens.len());
    tokens
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
