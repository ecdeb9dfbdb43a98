//! Database-specific error types and conversions.

use dicri_core::error::CoreError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Failed to decode row: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique constraint violated for {entity}")]
    Conflict { entity: String },
}

impl DbError {
    /// Classify a write failure: unique-index violations become
    /// `Conflict`, everything else stays a database error.
    pub fn from_write(entity: &str, err: surrealdb::Error) -> Self {
        if err.to_string().contains("already contains") {
            DbError::Conflict {
                entity: entity.into(),
            }
        } else {
            DbError::Surreal(err)
        }
    }
}

impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            DbError::Conflict { entity } => CoreError::Conflict { entity },
            other => CoreError::Database(other.to_string()),
        }
    }
}
