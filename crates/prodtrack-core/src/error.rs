//! # Error Types
//!
//! Domain-specific error types for prodtrack-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  prodtrack-core errors (this file)                                     │
//! │  ├── CoreError        - Lifecycle and lookup failures                  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  prodtrack-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP API errors (in app)                                              │
//! │  └── ApiError         - What the client sees (JSON envelope)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP status            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant belongs to exactly one category of the public taxonomy
//! (NotFound, Conflict, InvalidState, Validation), see [`CoreError::kind`].

use thiserror::Error;

use crate::types::ProductionStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product carries the scanned/requested code or id.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No production document with this id.
    #[error("Production not found: {0}")]
    ProductionNotFound(String),

    /// The pause id does not match any record of the production.
    #[error("Pause {pause_id} not found in production {production_id}")]
    PauseNotFound {
        production_id: String,
        pause_id: String,
    },

    /// Another production already uses this batch number.
    ///
    /// ## User Workflow
    /// ```text
    /// Operator scans "A123", types batch "L001"
    ///      │
    ///      ▼
    /// Lookup by batch number → found (any product)
    ///      │
    ///      ▼
    /// DuplicateBatchNumber("L001")
    ///      │
    ///      ▼
    /// UI shows: "Batch number L001 is already used"
    /// ```
    #[error("Batch number '{0}' is already used")]
    DuplicateBatchNumber(String),

    /// Another product already uses this code.
    #[error("Product code '{0}' is already used")]
    DuplicateProductCode(String),

    /// The production is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Editing ingredients or quality results of a completed/failed batch
    /// - Recording a pause on a terminal batch
    /// - Completing or failing a batch twice
    #[error("Production {production_id} is {current_status}, cannot {operation}")]
    InvalidProductionStatus {
        production_id: String,
        current_status: ProductionStatus,
        operation: String,
    },

    /// The pause was already closed.
    #[error("Pause {pause_id} is already closed")]
    PauseAlreadyClosed { pause_id: String },

    /// A pause is still open on this production; only one may be open at a time.
    #[error("Pause {pause_id} is still open, close it before starting another")]
    PauseAlreadyOpen { pause_id: String },

    /// Product is inactive and cannot start new batches.
    #[error("Product {0} is inactive")]
    ProductInactive(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Public error taxonomy used by callers to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidState,
    Validation,
}

impl CoreError {
    /// Maps the variant onto the public taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ProductNotFound(_)
            | CoreError::ProductionNotFound(_)
            | CoreError::PauseNotFound { .. } => ErrorKind::NotFound,
            CoreError::DuplicateBatchNumber(_) | CoreError::DuplicateProductCode(_) => {
                ErrorKind::Conflict
            }
            CoreError::InvalidProductionStatus { .. }
            | CoreError::PauseAlreadyClosed { .. }
            | CoreError::PauseAlreadyOpen { .. } => ErrorKind::InvalidState,
            CoreError::ProductInactive(_) | CoreError::Validation(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Numeric value is above its ceiling.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: i64 },

    /// Numeric value is not a finite number.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Invalid format (e.g., invalid UUID, malformed range).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value inside one payload.
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
