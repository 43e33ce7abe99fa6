//! Protected columns removed from the restricted patch surface.

use std::collections::{BTreeSet, HashMap};

use crate::document::Document;
use crate::{GuardError, GuardResult};

/// Columns a table's standard `patch` entry point refuses to touch.
///
/// Documents are runtime JSON maps, so the restriction is an explicit runtime
/// check on the payload. It guards against accidental use from calling code,
/// not against an adversarial caller: `dangerously_patch` bypasses it with
/// otherwise identical behavior, and any caller holding the guard can call
/// the bypass.
#[derive(Debug, Clone, Default)]
pub struct ProtectedColumns {
    tables: HashMap<String, BTreeSet<String>>,
}

impl ProtectedColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Protect columns on a table.
    pub fn table<I, S>(mut self, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .entry(table.into())
            .or_default()
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub(crate) fn tables(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.tables
            .iter()
            .map(|(table, columns)| (table.as_str(), columns))
    }

    /// Reject a patch payload touching any protected column.
    pub(crate) fn check(&self, table: &str, data: &Document) -> GuardResult<()> {
        let Some(protected) = self.tables.get(table) else {
            return Ok(());
        };
        for column in data.keys() {
            if protected.contains(column) {
                return Err(GuardError::ProtectedColumn {
                    table: table.to_string(),
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }
}
