// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a ranked search: documents, hits, and pages.
//!
//! A [`Document`] is a stable identity plus a flat map of named field values.
//! The derived keyword set lives inside that map (under the configured
//! keywords path) so it travels with the document through the store like any
//! other field. A computed relevance score never does - it is attached to
//! [`SearchHit`] result records only, so the source-of-truth document stays
//! untouched by query execution.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Keyword set**: the value under the keywords path is always the
//!   deduplicated stem sequence over the configured searchable fields,
//!   recomputed on creation and on any searchable-field change.
//! - **Relevance**: meaningful only relative to other hits of the same
//!   query. Never compare across queries or datasets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Type-safe document identifier.
///
/// Prevents accidentally passing a field name where an identity is expected.
/// Identity is an opaque string - whatever the backing store uses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create an identifier from anything string-like.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        DocumentId(id.into())
    }

    /// Get the underlying value.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        DocumentId(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        DocumentId(id)
    }
}

/// A single field value on a document.
///
/// `Nested` is produced only by populate directives resolving a referenced
/// identity into an inline projected document - stored documents carry text
/// and text lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    TextList(Vec<String>),
    Nested(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// The value as a single text, if it is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// The searchable text of the value: text as-is, lists joined with a
    /// space. Nested values have no searchable text.
    pub fn searchable_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(value) => Some(value.clone()),
            FieldValue::TextList(items) => Some(items.join(" ")),
            FieldValue::Nested(_) => None,
        }
    }
}

/// An opaque record with a stable identity and named field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>) -> Self {
        Document {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field assignment.
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Builder-style text field assignment.
    pub fn with_text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_field(name, FieldValue::Text(value.into()))
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// The keyword tokens stored under `path`, empty if none were derived.
    pub fn keywords(&self, path: &str) -> &[String] {
        match self.fields.get(path) {
            Some(FieldValue::TextList(tokens)) => tokens,
            _ => &[],
        }
    }

    /// Overwrite the keyword set stored under `path`.
    pub fn set_keywords(&mut self, path: &str, tokens: Vec<String>) {
        self.fields.insert(path.to_string(), FieldValue::TextList(tokens));
    }
}

/// Sort direction for an explicit sort specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Caller-supplied ordering, honored natively by the storage collaborator.
///
/// When present, ranking by relevance is skipped entirely - relevance is
/// still computed and attached for display, but does not affect order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        SortSpec {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        SortSpec {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }
}

/// Join directive: resolve the referenced document stored at `path` inline,
/// optionally limited to a sub-projection of its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Populate {
    pub path: String,
    #[serde(default)]
    pub fields: Option<Vec<String>>,
}

/// A (field, multiplier) pair marking a field whose exact token overlap with
/// the query is amplified during scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceWeight {
    pub field: String,
    pub multiplier: f64,
}

impl ImportanceWeight {
    pub fn new(field: impl Into<String>, multiplier: f64) -> Self {
        ImportanceWeight {
            field: field.into(),
            multiplier,
        }
    }
}

/// One ranked result: the re-fetched document plus the relevance computed
/// during the ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub document: Document,
    pub relevance: f64,
}

/// An ordered, paginated, scored result set.
///
/// `total_count` is the number of candidates the coarse filter produced
/// *before* pagination, regardless of slicing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage {
    pub results: Vec<SearchHit>,
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn searchable_text_joins_lists_with_spaces() {
        let value = FieldValue::TextList(vec!["red".to_string(), "green".to_string()]);
        assert_eq!(value.searchable_text().as_deref(), Some("red green"));
    }

    #[test]
    fn searchable_text_of_nested_is_none() {
        let value = FieldValue::Nested(BTreeMap::new());
        assert_eq!(value.searchable_text(), None);
    }

    #[test]
    fn keywords_default_to_empty() {
        let doc = Document::new("a");
        assert!(doc.keywords("_keywords").is_empty());
    }

    #[test]
    fn set_keywords_overwrites_in_place() {
        let mut doc = Document::new("a");
        doc.set_keywords("_keywords", vec!["run".to_string()]);
        doc.set_keywords("_keywords", vec!["walk".to_string()]);
        assert_eq!(doc.keywords("_keywords"), ["walk".to_string()]);
    }

    #[test]
    fn field_value_deserializes_untagged() {
        let text: FieldValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(text, FieldValue::Text("hello".to_string()));

        let list: FieldValue = serde_json::from_str("[\"a\", \"b\"]").unwrap();
        assert_eq!(
            list,
            FieldValue::TextList(vec!["a".to_string(), "b".to_string()])
        );
    }
}
