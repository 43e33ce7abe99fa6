//! Documents, identity, and field helpers.

use serde::{Deserialize, Serialize};

/// The intrinsic identity column every stored document carries.
pub const ID_FIELD: &str = "_id";

/// A structured record belonging to a table.
///
/// Shapes are declared by the external store's schema; this layer only reads
/// the fields a given plugin cares about.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Identity assigned by the store when a document is inserted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A row returned by an index lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub fields: Document,
}

impl StoredDocument {
    /// Field value, treating JSON `null` as absent.
    pub fn present(&self, column: &str) -> Option<&serde_json::Value> {
        present(&self.fields, column)
    }
}

/// Field value, treating JSON `null` as absent.
///
/// Uniqueness is never enforced on omitted fields, and a field explicitly set
/// to `null` counts as omitted.
pub fn present<'a>(doc: &'a Document, column: &str) -> Option<&'a serde_json::Value> {
    doc.get(column).filter(|value| !value.is_null())
}

/// Shallow-merge `defaults` under `data`. Explicit incoming fields always
/// win over configured defaults, never the reverse.
pub fn merge_defaults(defaults: &Document, data: Document) -> Document {
    let mut merged = defaults.clone();
    for (key, value) in data {
        merged.insert(key, value);
    }
    merged
}
