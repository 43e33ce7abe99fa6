//! Uniqueness plugins: single-column and composite-row.
//!
//! Both variants are read-then-decide checks with no transactional isolation
//! across concurrent calls: two writers can both pass the lookup before
//! either row lands. The external store's own durable unique constraint is
//! the correctness backstop; these checks exist to fail early with a precise,
//! typed error.

use std::collections::HashMap;

use crate::descriptor::{BoundDescriptor, IndexSpec};
use crate::document::{self, Document, DocumentId, ID_FIELD, StoredDocument};
use crate::plugin::{ConflictDetails, WriteContext};
use crate::schema::SchemaRegistry;
use crate::store::IndexQuery;
use crate::{GuardError, GuardResult};

/// Single-column uniqueness per table, checked through single-column index
/// lookups.
#[derive(Debug, Clone, Default)]
pub struct UniqueColumns {
    tables: HashMap<String, Vec<IndexSpec>>,
}

impl UniqueColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce uniqueness on a table through the given descriptors, checked
    /// in the order given.
    pub fn table<I, S>(mut self, table: impl Into<String>, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<IndexSpec>,
    {
        self.tables
            .entry(table.into())
            .or_default()
            .extend(specs.into_iter().map(Into::into));
        self
    }

    pub(crate) fn bind(&self, schema: &SchemaRegistry) -> GuardResult<BoundUnique> {
        BoundUnique::bind(&self.tables, schema, Arity::Single)
    }
}

/// Composite-tuple uniqueness per table, checked through composite index
/// lookups across all tuple columns simultaneously.
#[derive(Debug, Clone, Default)]
pub struct UniqueRows {
    tables: HashMap<String, Vec<IndexSpec>>,
}

impl UniqueRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce tuple uniqueness on a table through the given descriptors,
    /// checked in the order given.
    pub fn table<I, S>(mut self, table: impl Into<String>, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<IndexSpec>,
    {
        self.tables
            .entry(table.into())
            .or_default()
            .extend(specs.into_iter().map(Into::into));
        self
    }

    pub(crate) fn bind(&self, schema: &SchemaRegistry) -> GuardResult<BoundUnique> {
        BoundUnique::bind(&self.tables, schema, Arity::Composite)
    }
}

enum Arity {
    Single,
    Composite,
}

/// Descriptors bound against the registry, shared by both plugin kinds.
#[derive(Debug, Clone, Default)]
pub(crate) struct BoundUnique {
    tables: HashMap<String, Vec<BoundDescriptor>>,
}

impl BoundUnique {
    fn bind(
        tables: &HashMap<String, Vec<IndexSpec>>,
        schema: &SchemaRegistry,
        arity: Arity,
    ) -> GuardResult<Self> {
        let mut bound_tables = HashMap::with_capacity(tables.len());
        for (table, specs) in tables {
            let mut bound = Vec::with_capacity(specs.len());
            for spec in specs {
                let descriptor = spec.normalize().bind(schema, table)?;
                if matches!(arity, Arity::Single) && descriptor.columns.len() != 1 {
                    return Err(GuardError::Config(format!(
                        "index '{}' on table '{table}' keys {} columns; \
                         single-column uniqueness needs exactly one",
                        descriptor.index,
                        descriptor.columns.len()
                    )));
                }
                bound.push(descriptor);
            }
            bound_tables.insert(table.clone(), bound);
        }
        Ok(Self {
            tables: bound_tables,
        })
    }

    /// Run every descriptor configured for the context's table, in order,
    /// failing fast on the first genuine conflict.
    pub(crate) async fn check(&self, cx: &WriteContext<'_>, data: &Document) -> GuardResult<()> {
        let Some(descriptors) = self.tables.get(cx.table) else {
            return Ok(());
        };
        for descriptor in descriptors {
            check_descriptor(cx, descriptor, data).await?;
        }
        Ok(())
    }
}

async fn check_descriptor(
    cx: &WriteContext<'_>,
    descriptor: &BoundDescriptor,
    data: &Document,
) -> GuardResult<()> {
    // Uniqueness is not enforced on omitted fields: if any key column is
    // absent (or null) in the payload, no lookup is performed.
    let mut values = Vec::with_capacity(descriptor.columns.len());
    for column in &descriptor.columns {
        match document::present(data, column) {
            Some(value) => values.push(value.clone()),
            None => {
                tracing::debug!(
                    table = cx.table,
                    index = %descriptor.index,
                    column = %column,
                    "key column absent, skipping uniqueness check"
                );
                return Ok(());
            }
        }
    }

    let mut query = IndexQuery::new(cx.table, descriptor.index.clone());
    for (column, value) in descriptor.columns.iter().zip(&values) {
        query = query.eq(column.clone(), value.clone());
    }
    let Some(existing) = cx.store.find_unique(query).await? else {
        return Ok(());
    };

    if is_same_document(descriptor, &existing, data, cx.patch_id) {
        return Ok(());
    }

    tracing::warn!(
        table = cx.table,
        index = %descriptor.index,
        existing = %existing.id,
        "unique constraint violated"
    );
    let details = ConflictDetails {
        table: cx.table.to_string(),
        columns: descriptor.columns.clone(),
        values,
        existing,
    };
    if let Some(observer) = cx.observer {
        observer.on_conflict(&details).await;
    }
    Err(GuardError::UniqueViolation {
        table: details.table,
        columns: details.columns,
        values: details.values,
    })
}

/// Whether the conflicting row is the document being written.
///
/// A patch that collides with its own row is never a conflict, regardless of
/// configured identifiers. Beyond that, any identifier column holding an
/// equal non-null value on both sides marks the rows as the same logical
/// document.
fn is_same_document(
    descriptor: &BoundDescriptor,
    existing: &StoredDocument,
    data: &Document,
    patch_id: Option<&DocumentId>,
) -> bool {
    if let Some(patch_id) = patch_id {
        if existing.id == *patch_id {
            return true;
        }
    }
    for identifier in &descriptor.identifiers {
        // Intrinsic identity is compared against the patch id above; listing
        // it as an identifier is allowed but adds nothing.
        if identifier == ID_FIELD {
            continue;
        }
        let (Some(ours), Some(theirs)) =
            (document::present(data, identifier), existing.present(identifier))
        else {
            continue;
        };
        if ours == theirs {
            return true;
        }
    }
    false
}
