//! Write validation for document table stores.
//!
//! A configuration-driven layer that intercepts inserts and patches before
//! they reach a table store's native write primitives: default values are
//! merged into insert payloads, protected columns are fenced off from the
//! standard patch surface, and single-column or composite-row uniqueness is
//! checked through the store's own indexes. Plugins run strictly in pipeline
//! order and the first failure aborts the operation before any write is
//! issued.
//!
//! # Core pieces
//!
//! - [`SchemaRegistry`]: read-only view of the store's tables and indexes
//! - [`TableStore`]: seam to the external store (index lookups + native writes)
//! - [`DefaultValues`], [`ProtectedColumns`], [`UniqueColumns`], [`UniqueRows`]:
//!   the plugin configurations
//! - [`Guard`]: a verified configuration exposing `insert`, `patch`, and
//!   `dangerously_patch`
//!
//! # Concurrency
//!
//! The uniqueness checks are advisory pre-validation: each is a read followed
//! by a decision, with no isolation across concurrent calls. The store's own
//! durable unique constraints remain the correctness backstop under
//! concurrent load.

#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::unwrap_in_result)
)]

mod defaults;
mod descriptor;
mod document;
mod error;
mod guard;
mod plugin;
mod protect;
mod schema;
mod store;
mod unique;

pub use defaults::DefaultValues;
pub use descriptor::{IndexDescriptor, IndexSpec};
pub use document::{Document, DocumentId, ID_FIELD, StoredDocument, merge_defaults, present};
pub use error::{GuardError, GuardResult};
pub use guard::{Guard, GuardConfig, PluginConfig};
pub use plugin::{ConflictDetails, ConflictObserver, WriteContext};
pub use protect::ProtectedColumns;
pub use schema::{IndexDef, SchemaRegistry, TableSchema};
pub use store::{IndexQuery, TableStore};
pub use unique::{UniqueColumns, UniqueRows};
