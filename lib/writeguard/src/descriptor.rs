//! Index descriptor shorthand and its canonical form.
//!
//! Callers configure uniqueness checks as either a bare index name or an
//! explicit descriptor with identifier columns. Both shapes normalize into
//! [`IndexDescriptor`]; binding against the schema registry then resolves the
//! index into its declared key columns. Key columns always come from the
//! schema, never from parsing the index name.

use serde::{Deserialize, Serialize};

use crate::document::ID_FIELD;
use crate::schema::SchemaRegistry;
use crate::{GuardError, GuardResult};

/// Heterogeneous index config accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexSpec {
    /// Bare index name; no identifiers.
    Name(String),
    /// Explicit form with identifier columns.
    Full {
        index: String,
        #[serde(default)]
        identifiers: Vec<String>,
    },
}

impl IndexSpec {
    /// Explicit constructor for the full form.
    pub fn with_identifiers<I, S>(index: impl Into<String>, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndexSpec::Full {
            index: index.into(),
            identifiers: identifiers.into_iter().map(Into::into).collect(),
        }
    }

    /// Canonicalize into an [`IndexDescriptor`], defaulting `identifiers` to
    /// an empty list. Total over both accepted shapes, and idempotent: a spec
    /// built from an already-canonical descriptor normalizes back to an equal
    /// descriptor.
    pub fn normalize(&self) -> IndexDescriptor {
        match self {
            IndexSpec::Name(index) => IndexDescriptor {
                index: index.clone(),
                identifiers: Vec::new(),
            },
            IndexSpec::Full { index, identifiers } => IndexDescriptor {
                index: index.clone(),
                identifiers: identifiers.clone(),
            },
        }
    }
}

impl From<&str> for IndexSpec {
    fn from(index: &str) -> Self {
        IndexSpec::Name(index.to_string())
    }
}

impl From<String> for IndexSpec {
    fn from(index: String) -> Self {
        IndexSpec::Name(index)
    }
}

impl From<IndexDescriptor> for IndexSpec {
    fn from(descriptor: IndexDescriptor) -> Self {
        IndexSpec::Full {
            index: descriptor.index,
            identifiers: descriptor.identifiers,
        }
    }
}

/// Canonical descriptor: an index name plus the columns whose equality with a
/// conflicting row marks it as the same logical document rather than a true
/// conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub index: String,
    pub identifiers: Vec<String>,
}

impl IndexDescriptor {
    /// Bind against the registry, verifying that the index exists on the
    /// table and that every identifier is a declared column (or the intrinsic
    /// `_id` field).
    pub(crate) fn bind(
        &self,
        schema: &SchemaRegistry,
        table: &str,
    ) -> GuardResult<BoundDescriptor> {
        let index = schema.resolve_index(table, &self.index)?;
        if index.columns.is_empty() {
            return Err(GuardError::Config(format!(
                "index '{}' on table '{table}' declares no key columns",
                self.index
            )));
        }

        let table_schema = schema.require_table(table)?;
        for identifier in &self.identifiers {
            if identifier != ID_FIELD && !table_schema.has_column(identifier) {
                return Err(GuardError::Config(format!(
                    "identifier '{identifier}' is not a column on table '{table}'"
                )));
            }
        }

        Ok(BoundDescriptor {
            index: self.index.clone(),
            columns: index.columns.clone(),
            identifiers: self.identifiers.clone(),
        })
    }
}

/// A descriptor resolved against the schema registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BoundDescriptor {
    pub(crate) index: String,
    pub(crate) columns: Vec<String>,
    pub(crate) identifiers: Vec<String>,
}
