//! Table schema registry.
//!
//! A read-only view of the external store's declared tables and indexes.
//! The guard consumes it to resolve index names into their declared key
//! columns and to validate plugin configuration when the guard is built.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{GuardError, GuardResult};

/// A named, queryable secondary access path into a table, keyed by one or
/// more columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    pub name: String,
    pub columns: Vec<String>,
}

/// Column and index declarations for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<String>,
    pub indexes: Vec<IndexDef>,
}

impl TableSchema {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Declare a column.
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    /// Declare an index over one or more columns.
    pub fn index<I, S>(mut self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexes.push(IndexDef {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Look up a declared index by name.
    pub fn index_def(&self, name: &str) -> Option<&IndexDef> {
        self.indexes.iter().find(|index| index.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }
}

/// Mapping from table name to schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaRegistry {
    tables: HashMap<String, TableSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table schema, replacing any previous definition.
    pub fn register(mut self, schema: TableSchema) -> Self {
        self.tables.insert(schema.table.clone(), schema);
        self
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Resolve a table, failing with a configuration error when unknown.
    pub(crate) fn require_table(&self, name: &str) -> GuardResult<&TableSchema> {
        self.table(name)
            .ok_or_else(|| GuardError::Config(format!("unknown table '{name}'")))
    }

    /// Resolve an index on a table, failing with a configuration error when
    /// the table or the index is not declared.
    pub(crate) fn resolve_index(&self, table: &str, index: &str) -> GuardResult<&IndexDef> {
        self.require_table(table)?.index_def(index).ok_or_else(|| {
            GuardError::Config(format!("table '{table}' has no index '{index}'"))
        })
    }
}
