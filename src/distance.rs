// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! String-similarity metrics for fuzzy token matching.
//!
//! A [`DistanceMetric`] maps two tokens to a similarity in `[0, 1]`, where
//! `1.0` means identical. The scorer only ever compares a similarity against
//! its threshold and sums it, so any metric honoring the range slots in.
//!
//! The bundled metrics are thin wrappers over `strsim`, selected by name
//! through [`metric_by_name`]. Jaro-Winkler is the default: it front-loads
//! agreement, which suits stemmed tokens where the root carries the signal.

/// Similarity between two tokens, in `[0, 1]`.
pub trait DistanceMetric: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Jaro-Winkler similarity (the default metric).
pub struct JaroWinkler;

impl DistanceMetric for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::jaro_winkler(a, b)
    }
}

/// Plain Jaro similarity, without the common-prefix boost.
pub struct Jaro;

impl DistanceMetric for Jaro {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::jaro(a, b)
    }
}

/// Levenshtein edit distance, normalized to a similarity.
pub struct NormalizedLevenshtein;

impl DistanceMetric for NormalizedLevenshtein {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b)
    }
}

/// Sørensen-Dice coefficient over character bigrams.
pub struct SorensenDice;

impl DistanceMetric for SorensenDice {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::sorensen_dice(a, b)
    }
}

/// Look up a distance metric by configured name.
///
/// Returns `None` for unrecognized names so the caller can reject the
/// configuration instead of silently falling back.
pub fn metric_by_name(name: &str) -> Option<Box<dyn DistanceMetric>> {
    match name {
        "jaro-winkler" => Some(Box::new(JaroWinkler)),
        "jaro" => Some(Box::new(Jaro)),
        "levenshtein" => Some(Box::new(NormalizedLevenshtein)),
        "sorensen-dice" | "dice" => Some(Box::new(SorensenDice)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_tokens_score_one() {
        assert!((JaroWinkler.similarity("run", "run") - 1.0).abs() < f64::EPSILON);
        assert!((NormalizedLevenshtein.similarity("run", "run") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn disjoint_tokens_score_zero() {
        assert!(JaroWinkler.similarity("abc", "xyz") < f64::EPSILON);
    }

    #[test]
    fn similarity_stays_in_unit_range() {
        let metrics: Vec<Box<dyn DistanceMetric>> = vec![
            Box::new(JaroWinkler),
            Box::new(Jaro),
            Box::new(NormalizedLevenshtein),
            Box::new(SorensenDice),
        ];
        for metric in &metrics {
            for (a, b) in [("run", "rung"), ("fast", "feast"), ("", "x"), ("", "")] {
                let similarity = metric.similarity(a, b);
                assert!((0.0..=1.0).contains(&similarity), "{a} vs {b}: {similarity}");
            }
        }
    }

    #[test]
    fn near_tokens_clear_the_scoring_threshold() {
        // A one-character typo on a stemmed token should stay well above 0.5.
        assert!(JaroWinkler.similarity("photograph", "fotograph") > 0.5);
    }

    #[test]
    fn unknown_metric_name_is_rejected() {
        assert!(metric_by_name("cosine").is_none());
        assert!(metric_by_name("jaro-winkler").is_some());
    }
}
