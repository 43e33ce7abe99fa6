//! External store seam: index lookups and native write primitives.
//!
//! The store's query execution and storage engine are black boxes. Failures
//! from these primitives propagate to the caller unchanged; cancellation and
//! timeouts are whatever the backend's client exposes.

use async_trait::async_trait;

use crate::document::{Document, DocumentId, StoredDocument};
use crate::GuardResult;

/// An equality lookup against a named index.
#[derive(Debug, Clone)]
pub struct IndexQuery {
    pub table: String,
    pub index: String,
    pub keys: Vec<(String, serde_json::Value)>,
}

impl IndexQuery {
    pub fn new(table: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            index: index.into(),
            keys: Vec::new(),
        }
    }

    /// Bind an equality on a key column.
    pub fn eq(mut self, column: impl Into<String>, value: serde_json::Value) -> Self {
        self.keys.push((column.into(), value));
        self
    }
}

/// The external document store this layer validates writes for.
///
/// Implemented by backend crates (e.g. the in-memory backend); the guard
/// holds no connection of its own and is handed a store per call.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Equality lookup expecting at most one match.
    ///
    /// An index advertised as unique-shaped that matches more than one row is
    /// a contract violation by the store and must surface as an error.
    async fn find_unique(&self, query: IndexQuery) -> GuardResult<Option<StoredDocument>>;

    /// Native insert primitive. The guard invokes this only after every
    /// plugin check has passed.
    async fn insert(&self, table: &str, document: Document) -> GuardResult<DocumentId>;

    /// Native patch primitive. The guard invokes this only after every
    /// plugin check has passed.
    async fn patch(&self, table: &str, id: &DocumentId, patch: Document) -> GuardResult<()>;
}
