//! Database-specific error types and conversions.

use orgplane_core::error::OrgError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Unique constraint violated on {entity}: {detail}")]
    DuplicateKey { entity: String, detail: String },

    #[error("Invalid collection name: {0:?}")]
    InvalidCollectionName(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Malformed record: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl DbError {
    /// Classify a failed statement, recognizing unique index and
    /// "already exists" rejections as [`DbError::DuplicateKey`].
    pub(crate) fn from_statement(err: surrealdb::Error, entity: &str) -> Self {
        let detail = err.to_string();
        if detail.contains("already contains") || detail.contains("already exists") {
            DbError::DuplicateKey {
                entity: entity.into(),
                detail,
            }
        } else {
            DbError::Query(detail)
        }
    }

    pub(crate) fn not_found(entity: &str, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<DbError> for OrgError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => OrgError::NotFound { entity, id },
            DbError::DuplicateKey { entity, .. } => OrgError::Conflict { entity },
            DbError::InvalidCollectionName(name) => OrgError::InvalidName { name },
            other => OrgError::Database(other.to_string()),
        }
    }
}
