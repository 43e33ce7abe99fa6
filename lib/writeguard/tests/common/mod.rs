//! Shared test fixtures: a schema registry, a document literal helper, and a
//! call-counting store wrapper.

#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::unwrap_in_result)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use writeguard::{
    Document, DocumentId, GuardResult, IndexQuery, SchemaRegistry, StoredDocument, TableSchema,
    TableStore,
};
use writeguard_memory::MemoryStore;

/// Registry used across the test suites.
pub fn schema() -> SchemaRegistry {
    SchemaRegistry::new()
        .register(
            TableSchema::new("users")
                .column("username")
                .column("email")
                .column("name")
                .column("role")
                .index("by_username", ["username"])
                .index("by_email", ["email"]),
        )
        .register(
            TableSchema::new("memberships")
                .column("org")
                .column("user")
                .column("role")
                .index("by_org_user", ["org", "user"]),
        )
        .register(
            TableSchema::new("posts")
                .column("slug")
                .column("org")
                .column("title")
                .column("status")
                .column("views")
                .index("by_slug", ["slug"])
                .index("by_org_slug", ["org", "slug"]),
        )
}

/// Build a `Document` from a `serde_json::json!` object literal.
pub fn doc(value: serde_json::Value) -> Document {
    value.as_object().cloned().unwrap_or_default()
}

/// Store wrapper counting calls to each primitive.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    lookups: AtomicUsize,
    inserts: AtomicUsize,
    patches: AtomicUsize,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn patches(&self) -> usize {
        self.patches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TableStore for RecordingStore {
    async fn find_unique(&self, query: IndexQuery) -> GuardResult<Option<StoredDocument>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_unique(query).await
    }

    async fn insert(&self, table: &str, document: Document) -> GuardResult<DocumentId> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(table, document).await
    }

    async fn patch(&self, table: &str, id: &DocumentId, patch: Document) -> GuardResult<()> {
        self.patches.fetch_add(1, Ordering::SeqCst);
        self.inner.patch(table, id, patch).await
    }
}
