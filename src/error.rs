// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for search execution and bulk reindexing.
//!
//! Storage failures during a search are fatal to that one call and surface
//! unchanged. Storage failures during bulk reindexing are isolated per
//! document and collected into a [`ReindexReport`] - one bad save must not
//! abort its siblings. Retry policy, if any, belongs to the storage
//! collaborator or the caller, never here.

use crate::types::DocumentId;
use std::fmt;

/// A failure reported by the storage collaborator.
///
/// The engine never inspects the message - it propagates the error verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageError {
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        StorageError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage error: {}", self.message)
    }
}

impl std::error::Error for StorageError {}

/// Error type for search calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The request or engine configuration was rejected before any storage
    /// round-trip: blank query text, empty searchable-field list, or an
    /// unknown stemmer/distance name.
    Configuration(String),
    /// The storage collaborator failed during the coarse fetch, the final
    /// page re-fetch, or a save. Fatal to the current call.
    Storage(StorageError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Configuration(message) => {
                write!(f, "configuration error: {}", message)
            }
            SearchError::Storage(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Configuration(_) => None,
            SearchError::Storage(error) => Some(error),
        }
    }
}

impl From<StorageError> for SearchError {
    fn from(error: StorageError) -> Self {
        SearchError::Storage(error)
    }
}

/// One document's save failure during bulk reindexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReindexFailure {
    pub id: DocumentId,
    pub error: StorageError,
}

/// Outcome of a bulk keyword reindex.
///
/// The batch always runs to completion; failed saves are collected here
/// rather than raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReindexReport {
    /// Documents whose keyword sets were recomputed and saved.
    pub reindexed: usize,
    /// Documents whose save failed, in no particular order.
    pub failures: Vec<ReindexFailure>,
}

impl ReindexReport {
    /// Did every document save successfully?
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_propagates_through_search_error() {
        let error = SearchError::from(StorageError::new("connection reset"));
        assert_eq!(error.to_string(), "storage error: connection reset");
        assert!(matches!(error, SearchError::Storage(_)));
    }

    #[test]
    fn configuration_error_display() {
        let error = SearchError::Configuration("a query is required".to_string());
        assert_eq!(error.to_string(), "configuration error: a query is required");
    }

    #[test]
    fn empty_report_is_complete() {
        assert!(ReindexReport::default().is_complete());
    }
}
