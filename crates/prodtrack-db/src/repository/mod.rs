//! # Repository Module
//!
//! Database repository implementations for ProdTrack.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Service                                                               │
//! │       │  db.productions().get_by_id(id)                                │
//! │       ▼                                                                 │
//! │  ProductionRepository                                                  │
//! │  ├── insert(&self, production)                                         │
//! │  ├── get_by_id / get_by_batch_number                                   │
//! │  ├── list(&self, status)                                               │
//! │  └── save(&self, production)   ← revision-checked                      │
//! │       │                                                                 │
//! │       │  SQL (row ⇄ domain via JSON columns)                           │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and code lookup
//! - [`production::ProductionRepository`] - Batch documents

pub mod product;
pub mod production;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DbError, DbResult};

/// Encodes a nested value for a JSON TEXT column.
pub(crate) fn to_json<T: Serialize>(value: &T) -> DbResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decodes a JSON TEXT column.
pub(crate) fn from_json<T: DeserializeOwned>(text: &str) -> DbResult<T> {
    Ok(serde_json::from_str(text)?)
}

/// Attaches the offending value to a unique violation raised by SQLite.
pub(crate) fn with_duplicate_value(err: sqlx::Error, value: &str) -> DbError {
    match DbError::from(err) {
        DbError::Duplicate { column, .. } => DbError::duplicate(column, value),
        other => other,
    }
}
