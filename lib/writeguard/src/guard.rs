//! Configuration facade and plugin orchestrator.

use std::sync::Arc;

use crate::defaults::DefaultValues;
use crate::document::{Document, DocumentId};
use crate::plugin::{ConflictObserver, Plugin, WriteContext};
use crate::protect::ProtectedColumns;
use crate::schema::SchemaRegistry;
use crate::store::TableStore;
use crate::unique::{UniqueColumns, UniqueRows};
use crate::{GuardError, GuardResult};

/// A uniqueness plugin registered by the caller. Registered plugins run in
/// registration order, after defaults and the protected-columns filter.
#[derive(Debug, Clone)]
pub enum PluginConfig {
    UniqueColumns(UniqueColumns),
    UniqueRows(UniqueRows),
}

impl From<UniqueColumns> for PluginConfig {
    fn from(plugin: UniqueColumns) -> Self {
        PluginConfig::UniqueColumns(plugin)
    }
}

impl From<UniqueRows> for PluginConfig {
    fn from(plugin: UniqueRows) -> Self {
        PluginConfig::UniqueRows(plugin)
    }
}

/// Everything the guard is built from, constructed once at startup and
/// consumed by [`Guard::verify`]. There is no ambient registry: all
/// configuration state lives in this object.
#[derive(Default)]
pub struct GuardConfig {
    pub default_values: DefaultValues,
    pub protected_columns: ProtectedColumns,
    pub plugins: Vec<PluginConfig>,
    pub observer: Option<Arc<dyn ConflictObserver>>,
}

impl GuardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_values(mut self, defaults: DefaultValues) -> Self {
        self.default_values = defaults;
        self
    }

    pub fn protected_columns(mut self, protected: ProtectedColumns) -> Self {
        self.protected_columns = protected;
        self
    }

    /// Register a uniqueness plugin. Order matters: plugins run in the order
    /// they were registered.
    pub fn plugin(mut self, plugin: impl Into<PluginConfig>) -> Self {
        self.plugins.push(plugin.into());
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ConflictObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

/// A validated write surface over an external table store.
///
/// Construction binds every configured descriptor against the schema
/// registry, so configuration errors surface at startup rather than at first
/// call. The resulting value is immutable for the process lifetime; contexts
/// are created fresh per operation.
pub struct Guard {
    pipeline: Vec<Plugin>,
    observer: Option<Arc<dyn ConflictObserver>>,
}

impl Guard {
    /// Verify a configuration against the store's schema and assemble the
    /// write surface.
    pub fn verify(schema: &SchemaRegistry, config: GuardConfig) -> GuardResult<Self> {
        for table in config.default_values.tables() {
            schema.require_table(table)?;
        }
        for (table, columns) in config.protected_columns.tables() {
            let table_schema = schema.require_table(table)?;
            for column in columns {
                if !table_schema.has_column(column) {
                    return Err(GuardError::Config(format!(
                        "protected column '{column}' is not declared on table '{table}'"
                    )));
                }
            }
        }

        let mut pipeline = Vec::with_capacity(config.plugins.len() + 2);
        pipeline.push(Plugin::DefaultValues(config.default_values));
        pipeline.push(Plugin::ProtectedColumns(config.protected_columns));
        for plugin in config.plugins {
            pipeline.push(match plugin {
                PluginConfig::UniqueColumns(columns) => {
                    Plugin::UniqueColumn(columns.bind(schema)?)
                }
                PluginConfig::UniqueRows(rows) => Plugin::UniqueRow(rows.bind(schema)?),
            });
        }

        Ok(Self {
            pipeline,
            observer: config.observer,
        })
    }

    /// Validate and insert a document, returning the store-assigned identity.
    ///
    /// Defaults are merged first, then every plugin's insert hook runs in
    /// pipeline order; the store's native insert is invoked only after all of
    /// them pass.
    pub async fn insert(
        &self,
        store: &dyn TableStore,
        table: &str,
        data: Document,
    ) -> GuardResult<DocumentId> {
        let cx = WriteContext {
            store,
            table,
            patch_id: None,
            observer: self.observer.as_deref(),
        };
        let mut data = data;
        for plugin in &self.pipeline {
            data = plugin.on_insert(&cx, data).await?;
        }
        store.insert(table, data).await
    }

    /// Validate and apply a partial update through the restricted surface.
    pub async fn patch(
        &self,
        store: &dyn TableStore,
        table: &str,
        id: &DocumentId,
        data: Document,
    ) -> GuardResult<()> {
        self.run_patch(store, table, id, data, false).await
    }

    /// Identical to [`Guard::patch`] but skips the protected-columns
    /// restriction. Every other plugin still runs.
    pub async fn dangerously_patch(
        &self,
        store: &dyn TableStore,
        table: &str,
        id: &DocumentId,
        data: Document,
    ) -> GuardResult<()> {
        self.run_patch(store, table, id, data, true).await
    }

    async fn run_patch(
        &self,
        store: &dyn TableStore,
        table: &str,
        id: &DocumentId,
        mut data: Document,
        bypass_protection: bool,
    ) -> GuardResult<()> {
        let cx = WriteContext {
            store,
            table,
            patch_id: Some(id),
            observer: self.observer.as_deref(),
        };
        for plugin in &self.pipeline {
            if bypass_protection && matches!(plugin, Plugin::ProtectedColumns(_)) {
                continue;
            }
            data = plugin.on_patch(&cx, data).await?;
        }
        store.patch(table, id, data).await
    }
}
