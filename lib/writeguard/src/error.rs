use thiserror::Error;

/// Result type for guard operations.
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors surfaced by the validation layer.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Configuration references a table, index, or column the schema
    /// registry does not declare. Raised when the guard is built, not at
    /// first use.
    #[error("configuration error: {0}")]
    Config(String),

    /// A genuine duplicate was detected by a uniqueness plugin.
    #[error("unique constraint violated on table '{table}': {}", describe_pairs(.columns, .values))]
    UniqueViolation {
        table: String,
        columns: Vec<String>,
        values: Vec<serde_json::Value>,
    },

    /// The restricted patch surface received a protected column.
    #[error("column '{column}' on table '{table}' is protected from patching")]
    ProtectedColumn { table: String, column: String },

    /// A defaults provider failed. No defaults were applied and no write ran.
    #[error("default values provider failed: {0}")]
    Defaults(String),

    /// Failure from the external store's query or write primitives,
    /// propagated without retry or suppression.
    #[error("store error: {0}")]
    Store(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GuardError {
    /// Stable machine-readable code for callers that branch on error kind.
    pub fn code(&self) -> &'static str {
        match self {
            GuardError::Config(_) => "config",
            GuardError::UniqueViolation { .. } => "unique_violation",
            GuardError::ProtectedColumn { .. } => "protected_column",
            GuardError::Defaults(_) => "defaults",
            GuardError::Store(_) => "store",
            GuardError::Serialization(_) => "serialization",
        }
    }
}

fn describe_pairs(columns: &[String], values: &[serde_json::Value]) -> String {
    columns
        .iter()
        .zip(values)
        .map(|(column, value)| format!("{column} = {value}"))
        .collect::<Vec<_>>()
        .join(", ")
}
