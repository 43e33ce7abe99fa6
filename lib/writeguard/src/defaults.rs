//! Default field values merged into insert payloads before validation.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::document::{self, Document};
use crate::GuardResult;

type BoxedProvider =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = GuardResult<Document>> + Send>> + Send + Sync>;

/// Where a table's defaults come from.
#[derive(Clone)]
enum Source {
    Static(Document),
    Dynamic(BoxedProvider),
}

/// Per-table default field values.
///
/// Defaults apply to inserts only, and explicit incoming fields always win
/// over configured defaults. A dynamic provider may perform I/O; if it fails,
/// the failure propagates unchanged, no defaults are applied, and no write
/// proceeds.
#[derive(Clone, Default)]
pub struct DefaultValues {
    tables: HashMap<String, Source>,
}

impl DefaultValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Static defaults for a table.
    pub fn table(mut self, table: impl Into<String>, defaults: Document) -> Self {
        self.tables.insert(table.into(), Source::Static(defaults));
        self
    }

    /// Dynamic defaults computed fresh for every insert.
    pub fn table_with<F, Fut>(mut self, table: impl Into<String>, provider: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = GuardResult<Document>> + Send + 'static,
    {
        let provider: BoxedProvider = Arc::new(move || Box::pin(provider()));
        self.tables.insert(table.into(), Source::Dynamic(provider));
        self
    }

    pub(crate) fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Resolve the configured defaults for `table` and merge them under
    /// `data`.
    pub(crate) async fn apply(&self, table: &str, data: Document) -> GuardResult<Document> {
        let Some(source) = self.tables.get(table) else {
            return Ok(data);
        };
        let defaults = match source {
            Source::Static(defaults) => defaults.clone(),
            Source::Dynamic(provider) => provider().await?,
        };
        Ok(document::merge_defaults(&defaults, data))
    }
}

impl fmt::Debug for DefaultValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultValues")
            .field("tables", &self.tables.keys().collect::<Vec<_>>())
            .finish()
    }
}
