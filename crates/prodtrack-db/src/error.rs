//! Storage errors.
//!
//! ```text
//! sqlx::Error ──► DbError ──► ApiError (apps/prodtrack-api)
//!
//! Database(kind = UniqueViolation)      → Duplicate { column, value }
//! Database(kind = ForeignKeyViolation)  → InvalidReference
//! Database(other)                       → Query
//! PoolTimedOut / PoolClosed / Io        → Unavailable
//! anything else                         → Query
//! ```
//!
//! `Duplicate` carries the column SQLite names (`productions.batch_number`);
//! repositories fill in the offending value because SQLite doesn't report it.

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the write.
    #[error("Duplicate {column}: '{value}' already exists")]
    Duplicate { column: String, value: String },

    /// A row references a missing parent (production → product).
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// The row changed since it was loaded.
    ///
    /// ```text
    /// Request A: load rev 4 ─────────────── save WHERE revision = 4 → 0 rows
    /// Request B: load rev 4 ── save (4 → 5) ✓
    /// ```
    #[error("{entity} {id} was modified concurrently (expected revision {expected})")]
    RevisionMismatch {
        entity: String,
        id: String,
        expected: i64,
    },

    /// A JSON column holds something the current types can't read or write.
    #[error("Stored document is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The store can't be reached: pool closed, timed out or I/O failure.
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    Query(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(column: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::Duplicate {
            column: column.into(),
            value: value.into(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    DbError::duplicate(constraint_column(db_err.message()), "")
                }
                ErrorKind::ForeignKeyViolation => {
                    DbError::InvalidReference(db_err.message().to_string())
                }
                _ => DbError::Query(db_err.message().to_string()),
            },
            unavailable @ (sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)) => DbError::Unavailable(unavailable.to_string()),
            other => DbError::Query(other.to_string()),
        }
    }
}

/// `"UNIQUE constraint failed: productions.batch_number"` → `"productions.batch_number"`
fn constraint_column(message: &str) -> String {
    message
        .rsplit_once(": ")
        .map_or(message, |(_, column)| column)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_column() {
        assert_eq!(
            constraint_column("UNIQUE constraint failed: productions.batch_number"),
            "productions.batch_number"
        );
        assert_eq!(constraint_column("weird"), "weird");
    }

    #[test]
    fn test_revision_mismatch_message() {
        let err = DbError::RevisionMismatch {
            entity: "Production".to_string(),
            id: "p-1".to_string(),
            expected: 4,
        };
        assert_eq!(
            err.to_string(),
            "Production p-1 was modified concurrently (expected revision 4)"
        );
    }

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::Unavailable(_)
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::Unavailable(_)
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::Query(_)
        ));
    }
}
