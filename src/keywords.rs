// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Keyword derivation over a document's searchable fields.
//!
//! The canonical keyword set is the deduplicated stem sequence over the
//! configured searchable fields' concatenated text, in field-declaration
//! order. Deriving is pure; writing the result back onto the document and
//! persisting it are the engine's and the store's jobs respectively.

use crate::analyze::{unique_tokens, Tokenizer};
use crate::types::{Document, FieldValue};

/// Concatenated searchable text across `fields`, in declaration order.
///
/// List-valued fields are joined with a space; missing fields and nested
/// values contribute nothing.
pub fn searchable_text(document: &Document, fields: &[String]) -> String {
    fields
        .iter()
        .filter_map(|field| document.field(field).and_then(FieldValue::searchable_text))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive the keyword set: tokenize the concatenated searchable text and
/// dedupe preserving first occurrence.
///
/// Idempotent for an unchanged document and a deterministic tokenizer.
pub fn derive_keywords(
    document: &Document,
    fields: &[String],
    tokenizer: &dyn Tokenizer,
) -> Vec<String> {
    unique_tokens(tokenizer.tokenize_and_stem(&searchable_text(document, fields)))
}

/// Does any searchable field differ between `next` and the stored copy?
///
/// Drives the save lifecycle: keywords are re-derived only when this holds
/// (or when there is no stored copy at all).
pub fn fields_changed(next: &Document, stored: &Document, fields: &[String]) -> bool {
    fields
        .iter()
        .any(|field| next.field(field) != stored.field(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::SnowballTokenizer;

    fn doc() -> Document {
        Document::new("d1")
            .with_text("title", "Running Shoes")
            .with_field(
                "tags",
                FieldValue::TextList(vec!["running".to_string(), "outdoor".to_string()]),
            )
            .with_text("body", "Lightweight shoes for running fast.")
    }

    #[test]
    fn concatenates_in_declaration_order() {
        let fields = vec!["body".to_string(), "title".to_string()];
        assert_eq!(
            searchable_text(&doc(), &fields),
            "Lightweight shoes for running fast. Running Shoes"
        );
    }

    #[test]
    fn missing_fields_contribute_nothing() {
        let fields = vec!["title".to_string(), "subtitle".to_string()];
        assert_eq!(searchable_text(&doc(), &fields), "Running Shoes");
    }

    #[test]
    fn derives_deduplicated_stems() {
        let tokenizer = SnowballTokenizer::english();
        let fields = vec!["title".to_string(), "tags".to_string(), "body".to_string()];
        let keywords = derive_keywords(&doc(), &fields, &tokenizer);
        // "running" appears in three fields but stems to a single "run"
        assert_eq!(keywords.iter().filter(|k| *k == "run").count(), 1);
        assert!(keywords.contains(&"shoe".to_string()));
        assert!(keywords.contains(&"outdoor".to_string()));
    }

    #[test]
    fn derivation_is_idempotent() {
        let tokenizer = SnowballTokenizer::english();
        let fields = vec!["title".to_string(), "body".to_string()];
        let first = derive_keywords(&doc(), &fields, &tokenizer);
        let second = derive_keywords(&doc(), &fields, &tokenizer);
        assert_eq!(first, second);
    }

    #[test]
    fn detects_searchable_field_changes() {
        let fields = vec!["title".to_string()];
        let stored = doc();
        let mut next = doc();
        assert!(!fields_changed(&next, &stored, &fields));

        next.set_field("body", FieldValue::Text("changed".to_string()));
        assert!(!fields_changed(&next, &stored, &fields)); // body is not searchable here

        next.set_field("title", FieldValue::Text("Trail Boots".to_string()));
        assert!(fields_changed(&next, &stored, &fields));
    }
}
