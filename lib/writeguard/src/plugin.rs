//! The closed plugin set and the per-operation context threaded through it.

use async_trait::async_trait;

use crate::defaults::DefaultValues;
use crate::document::{Document, DocumentId, StoredDocument};
use crate::protect::ProtectedColumns;
use crate::store::TableStore;
use crate::unique::BoundUnique;
use crate::GuardResult;

/// Context for one insert or patch operation.
///
/// Created fresh per call and discarded when the call completes; nothing is
/// cached between operations.
pub struct WriteContext<'a> {
    pub store: &'a dyn TableStore,
    pub table: &'a str,
    /// Identity of the document being patched; `None` for inserts. Used to
    /// distinguish "updating myself" from "colliding with another row".
    pub patch_id: Option<&'a DocumentId>,
    pub observer: Option<&'a dyn ConflictObserver>,
}

/// Structured conflict metadata handed to the observer before the typed
/// error is raised.
#[derive(Debug, Clone)]
pub struct ConflictDetails {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<serde_json::Value>,
    pub existing: StoredDocument,
}

/// Caller-supplied hook invoked with conflict details before the uniqueness
/// error is raised. For logging, metrics, or telemetry enrichment; the return
/// value is ignored and control flow is unaffected.
#[async_trait]
pub trait ConflictObserver: Send + Sync {
    async fn on_conflict(&self, details: &ConflictDetails);
}

/// One validation/transform unit in the guard's pipeline.
///
/// A closed set dispatched by match. Plugins run strictly in pipeline order,
/// each hook completing (lookups included) before the next begins, so later
/// plugins may rely on earlier plugins' mutations to the payload. Hooks keep
/// no state between invocations.
pub(crate) enum Plugin {
    DefaultValues(DefaultValues),
    ProtectedColumns(ProtectedColumns),
    UniqueColumn(BoundUnique),
    UniqueRow(BoundUnique),
}

impl Plugin {
    pub(crate) async fn on_insert(
        &self,
        cx: &WriteContext<'_>,
        data: Document,
    ) -> GuardResult<Document> {
        match self {
            Plugin::DefaultValues(defaults) => defaults.apply(cx.table, data).await,
            // The patch-surface restriction has no insert-side behavior.
            Plugin::ProtectedColumns(_) => Ok(data),
            Plugin::UniqueColumn(unique) | Plugin::UniqueRow(unique) => {
                unique.check(cx, &data).await?;
                Ok(data)
            }
        }
    }

    pub(crate) async fn on_patch(
        &self,
        cx: &WriteContext<'_>,
        data: Document,
    ) -> GuardResult<Document> {
        match self {
            // Defaults apply to inserts only.
            Plugin::DefaultValues(_) => Ok(data),
            Plugin::ProtectedColumns(protected) => {
                protected.check(cx.table, &data)?;
                Ok(data)
            }
            Plugin::UniqueColumn(unique) | Plugin::UniqueRow(unique) => {
                unique.check(cx, &data).await?;
                Ok(data)
            }
        }
    }
}
