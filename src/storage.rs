// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The storage collaborator: a narrow find/save contract plus an in-memory
//! reference implementation.
//!
//! The engine needs very little from a store: filtered retrieval with a
//! projection, native sort, populate resolution, and a save. Everything
//! heavier (real persistence, indexing at scale, retries) lives behind this
//! trait, out of the engine's sight.
//!
//! [`MemoryStore`] is the bundled implementation - enough for tests, the
//! CLI, and small embedded collections. It enumerates documents by ascending
//! identity, which the ranking layer relies on for deterministic tie order.

use crate::error::StorageError;
use crate::types::{Document, DocumentId, FieldValue, Populate, SortOrder, SortSpec};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// One filter condition; a query is the conjunction of its conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// The field at `path` shares at least one value with `values`
    /// (membership test against a scalar, intersection against a list).
    AnyOf { path: String, values: Vec<String> },
    /// The document's identity is one of `ids`.
    IdIn(Vec<DocumentId>),
    /// The text field at `path` equals `value`; for list fields, any
    /// element equal to `value` matches.
    Equals { path: String, value: String },
}

impl Condition {
    /// Does `document` satisfy this condition?
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Condition::AnyOf { path, values } => match document.field(path) {
                Some(FieldValue::Text(value)) => values.iter().any(|v| v == value),
                Some(FieldValue::TextList(items)) => {
                    items.iter().any(|item| values.contains(item))
                }
                _ => false,
            },
            Condition::IdIn(ids) => ids.contains(&document.id),
            Condition::Equals { path, value } => match document.field(path) {
                Some(FieldValue::Text(text)) => text == value,
                Some(FieldValue::TextList(items)) => items.iter().any(|item| item == value),
                _ => false,
            },
        }
    }
}

/// Which fields a find returns. Identity is always included.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection(Option<BTreeSet<String>>);

impl Projection {
    /// Return every field.
    pub fn all() -> Self {
        Projection(None)
    }

    /// Return only the named fields.
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection(Some(names.into_iter().map(Into::into).collect()))
    }

    pub fn includes(&self, name: &str) -> bool {
        match &self.0 {
            None => true,
            Some(names) => names.contains(name),
        }
    }

    /// A copy of `document` limited to the projected fields.
    pub fn apply(&self, document: &Document) -> Document {
        match &self.0 {
            None => document.clone(),
            Some(names) => Document {
                id: document.id.clone(),
                fields: document
                    .fields
                    .iter()
                    .filter(|(name, _)| names.contains(name.as_str()))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
            },
        }
    }
}

/// Retrieval options a store honors natively.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Explicit ordering; absent means store enumeration order.
    pub sort: Option<SortSpec>,
    /// Join directives resolved inline on the returned documents.
    pub populate: Vec<Populate>,
}

/// The narrow contract the engine consumes.
///
/// Implementations must treat each call as an independent, failable unit;
/// the engine decides what a failure means for the operation in flight.
pub trait DocumentStore: Send + Sync {
    /// Documents satisfying every condition, projected and optionally
    /// sorted/populated.
    fn find(
        &self,
        conditions: &[Condition],
        projection: &Projection,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StorageError>;

    /// Fetch one document by identity.
    fn get(&self, id: &DocumentId) -> Result<Option<Document>, StorageError>;

    /// Persist a document, replacing any previous version.
    fn save(&self, document: Document) -> Result<(), StorageError>;
}

/// In-memory reference store: a read-write-locked map keyed by identity.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<DocumentId, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Seed a document directly, bypassing any save-side keyword logic.
    pub fn insert(&self, document: Document) {
        self.documents
            .write()
            .insert(document.id.clone(), document);
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn find(
        &self,
        conditions: &[Condition],
        projection: &Projection,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StorageError> {
        let documents = self.documents.read();

        // BTreeMap iteration gives ascending-id enumeration order.
        let mut matches: Vec<&Document> = documents
            .values()
            .filter(|document| conditions.iter().all(|c| c.matches(document)))
            .collect();

        if let Some(sort) = &options.sort {
            sort_documents(&mut matches, sort);
        }

        let mut results: Vec<Document> = matches
            .into_iter()
            .map(|document| projection.apply(document))
            .collect();

        for directive in &options.populate {
            for document in &mut results {
                populate_field(document, directive, &documents);
            }
        }

        Ok(results)
    }

    fn get(&self, id: &DocumentId) -> Result<Option<Document>, StorageError> {
        Ok(self.documents.read().get(id).cloned())
    }

    fn save(&self, document: Document) -> Result<(), StorageError> {
        self.documents
            .write()
            .insert(document.id.clone(), document);
        Ok(())
    }
}

/// Sort by a field's text value; documents missing the field sort last
/// regardless of direction.
fn sort_documents(documents: &mut [&Document], sort: &SortSpec) {
    documents.sort_by(|a, b| {
        let a_value = a.field(&sort.field).and_then(FieldValue::searchable_text);
        let b_value = b.field(&sort.field).and_then(FieldValue::searchable_text);
        match (a_value, b_value) {
            (Some(a_value), Some(b_value)) => match sort.order {
                SortOrder::Ascending => a_value.cmp(&b_value),
                SortOrder::Descending => b_value.cmp(&a_value),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Resolve a populate directive on one document: replace the referenced
/// identity at `path` with the referenced document's projected fields.
/// Dangling references and non-text values are left as they are.
fn populate_field(
    document: &mut Document,
    directive: &Populate,
    all: &BTreeMap<DocumentId, Document>,
) {
    let referenced_id = match document.field(&directive.path) {
        Some(FieldValue::Text(id)) => DocumentId::new(id.clone()),
        _ => return,
    };

    let Some(referenced) = all.get(&referenced_id) else {
        return;
    };

    let projection = match &directive.fields {
        Some(names) => Projection::fields(names.iter().cloned()),
        None => Projection::all(),
    };
    let projected = projection.apply(referenced);

    let mut nested = projected.fields;
    nested.insert(
        "id".to_string(),
        FieldValue::Text(projected.id.to_string()),
    );
    document.set_field(directive.path.clone(), FieldValue::Nested(nested));
}
