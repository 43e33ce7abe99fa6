//! In-memory table store backend.
//!
//! Backs tests, examples, and prototyping. Tables live behind one `RwLock`
//! and lookups scan the table, so this is not a production store; it does
//! honor the store contract the guard relies on, including the at-most-one
//! rule for unique-shaped index lookups.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;
use writeguard::{
    Document, DocumentId, GuardError, GuardResult, ID_FIELD, IndexQuery, StoredDocument,
    TableStore,
};

/// Column stamped on every inserted document with the insertion time.
pub const CREATED_AT_FIELD: &str = "_created_at";

/// In-memory document store keyed by table name.
///
/// Inserted documents are stamped with their generated `_id` and a
/// `_created_at` timestamp at microsecond precision.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, BTreeMap<DocumentId, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a copy of one document by id.
    pub async fn get(&self, table: &str, id: &DocumentId) -> Option<StoredDocument> {
        let tables = self.tables.read().await;
        let fields = tables.get(table)?.get(id)?.clone();
        Some(StoredDocument {
            id: id.clone(),
            fields,
        })
    }

    /// Number of documents in a table.
    pub async fn len(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map_or(0, BTreeMap::len)
    }

    pub async fn is_empty(&self, table: &str) -> bool {
        self.len(table).await == 0
    }
}

/// Current time in RFC 3339, truncated to microsecond precision.
fn now_micros() -> String {
    let micros = Utc::now().timestamp_micros();
    DateTime::from_timestamp_micros(micros)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp_nanos(0))
        .to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn find_unique(&self, query: IndexQuery) -> GuardResult<Option<StoredDocument>> {
        let tables = self.tables.read().await;
        let Some(rows) = tables.get(&query.table) else {
            return Ok(None);
        };

        let mut found: Option<StoredDocument> = None;
        for (id, fields) in rows {
            let matches = query
                .keys
                .iter()
                .all(|(column, value)| fields.get(column) == Some(value));
            if !matches {
                continue;
            }
            if let Some(first) = &found {
                return Err(GuardError::Store(format!(
                    "index '{}' on table '{}' matched more than one row ({} and {})",
                    query.index, query.table, first.id, id
                )));
            }
            found = Some(StoredDocument {
                id: id.clone(),
                fields: fields.clone(),
            });
        }
        Ok(found)
    }

    async fn insert(&self, table: &str, document: Document) -> GuardResult<DocumentId> {
        let id = DocumentId::new(Uuid::new_v4().to_string());
        let mut fields = document;
        fields.insert(
            ID_FIELD.to_string(),
            serde_json::Value::String(id.to_string()),
        );
        fields.insert(
            CREATED_AT_FIELD.to_string(),
            serde_json::Value::String(now_micros()),
        );

        let mut tables = self.tables.write().await;
        tables
            .entry(table.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn patch(&self, table: &str, id: &DocumentId, patch: Document) -> GuardResult<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.get_mut(id))
            .ok_or_else(|| {
                GuardError::Store(format!("no document '{id}' in table '{table}'"))
            })?;
        for (column, value) in patch {
            row.insert(column, value);
        }
        Ok(())
    }
}
