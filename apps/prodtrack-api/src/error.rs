//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in ProdTrack                              │
//! │                                                                         │
//! │  Handler → Service                                                     │
//! │         │                                                               │
//! │         ├── CoreError ── kind() ───────────┐                           │
//! │         ├── DbError ── constraint/revision ─┤                           │
//! │         ├── JsonRejection / QueryRejection ─┤                           │
//! │         │                                   ▼                           │
//! │         │                               ApiError                        │
//! │         │                                   │                           │
//! │         ▼                                   ▼                           │
//! │  { success: false, error: "..." }  with status code:                   │
//! │                                                                         │
//! │     NotFound 404 │ Conflict 409 │ InvalidState 400 │ Validation 400    │
//! │     Forbidden 403 │ MethodNotAllowed 405                               │
//! │     Internal 500 (generic message, detail logged)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use prodtrack_core::{CoreError, ErrorKind};
use prodtrack_db::DbError;
use tracing::{error, warn};

use crate::response::ApiResponse;

/// Error returned from every handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Operation not allowed in the batch's current status.
    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    /// Path exists but not for this method.
    #[error("{0}")]
    MethodNotAllowed(String),

    /// Message is already safe to show; the cause was logged.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InvalidState(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::NotFound(format!("{resource} not found: {id}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_client_error() {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, ApiResponse::error(self.to_string())).into_response()
    }
}

/// Converts core errors to API errors through the public taxonomy.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = match &err {
            CoreError::Validation(inner) => inner.to_string(),
            other => other.to_string(),
        };
        match err.kind() {
            ErrorKind::NotFound => ApiError::NotFound(message),
            ErrorKind::Conflict => ApiError::Conflict(message),
            ErrorKind::InvalidState => ApiError::InvalidState(message),
            ErrorKind::Validation => ApiError::Validation(message),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::Duplicate { column, value } => {
                if column.ends_with("batch_number") {
                    CoreError::DuplicateBatchNumber(value).into()
                } else if column.ends_with("code") {
                    CoreError::DuplicateProductCode(value).into()
                } else {
                    ApiError::Conflict(format!("{column} '{value}' already exists"))
                }
            }
            DbError::RevisionMismatch { entity, id, .. } => ApiError::Conflict(format!(
                "{entity} {id} was modified by another request, reload and retry"
            )),
            DbError::InvalidReference(message) => {
                error!("Foreign key violation: {}", message);
                ApiError::Validation("Invalid reference".to_string())
            }
            DbError::Json(e) => {
                error!("Stored document could not be decoded: {}", e);
                ApiError::Internal("Database operation failed".to_string())
            }
            DbError::Migration(e) => {
                error!("Database schema is not usable: {}", e);
                ApiError::Internal("Database unavailable".to_string())
            }
            DbError::Unavailable(e) => {
                error!("Database unavailable: {}", e);
                ApiError::Internal("Database unavailable".to_string())
            }
            DbError::Query(e) => {
                // Log the actual error but return a generic message
                error!("Database operation failed: {}", e);
                ApiError::Internal("Database operation failed".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
