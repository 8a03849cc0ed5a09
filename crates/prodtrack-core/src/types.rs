//! # Domain Types
//!
//! Core domain types used throughout ProdTrack.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐         ┌──────────────────────────────────┐      │
//! │  │    Product      │         │          Production              │      │
//! │  │  ─────────────  │ snapshot│  ──────────────────────────────  │      │
//! │  │  id (UUID)      │────────►│  id (UUID)                       │      │
//! │  │  code (business)│         │  batch_number (business, unique) │      │
//! │  │  recipe         │         │  product_code / product_name     │      │
//! │  │   ├ version     │         │  recipe_version                  │      │
//! │  │   ├ ingredients │────────►│  ingredients  (required, actual) │      │
//! │  │   ├ steps       │         │  pause_history                   │      │
//! │  │   └ checks      │────────►│  quality_results                 │      │
//! │  └─────────────────┘         └──────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for relations and URLs
//! - Business ID: (`code`, `batch_number`) - human-readable, scanned by operators
//!
//! ## Wire Format
//! All structs serialize in camelCase, enums in the lowercase/snake_case
//! spellings the frontend already uses (`in_progress`, `non-testé`, ...).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Units & Categories
// =============================================================================

/// Measurement unit of a recipe ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kg,
    G,
    L,
    Ml,
}

/// Kind of quality check defined by a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum QualityCheckType {
    Visual,
    Physical,
    Chemical,
    Microbiological,
    Functional,
    Olfactory,
    Environmental,
}

/// Why a production was paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PauseCategory {
    Equipment,
    Material,
    Personnel,
    Other,
}

impl PauseCategory {
    /// All categories, in display order.
    pub const ALL: [PauseCategory; 4] = [
        PauseCategory::Equipment,
        PauseCategory::Material,
        PauseCategory::Personnel,
        PauseCategory::Other,
    ];
}

/// Outcome of one quality check on a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum QualityOutcome {
    #[serde(rename = "conforme")]
    Conforme,
    #[serde(rename = "non-conforme")]
    NonConforme,
    #[default]
    #[serde(rename = "non-testé")]
    NonTeste,
}

// =============================================================================
// Product & Recipe
// =============================================================================

/// Whether a product can be used for new batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

/// One ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    pub name: String,
    /// Required quantity for one batch.
    pub quantity: f64,
    pub unit: Unit,
    #[serde(default)]
    pub notes: String,
}

/// One production step of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    pub order: u32,
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    /// Expected duration in minutes.
    #[serde(default)]
    pub duration_minutes: u32,
}

/// Definition of a quality check to run on every batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QualityCheck {
    pub name: String,
    #[serde(rename = "type")]
    pub check_type: QualityCheckType,
    /// Free text, or a numeric range encoded `"min-max"`.
    #[serde(default)]
    pub expected_value: String,
}

/// The recipe body as submitted by an administrator (no version info).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInput {
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
    #[serde(default)]
    pub quality_checks: Vec<QualityCheck>,
}

/// Versioned recipe stored on a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Starts at 1, incremented on every recipe replacement.
    pub version: i64,
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<RecipeStep>,
    pub quality_checks: Vec<QualityCheck>,
}

/// A product that can be manufactured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business code scanned by operators.
    pub code: String,

    pub name: String,

    pub category: String,

    pub status: ProductStatus,

    pub recipe: Recipe,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks if the product can start new batches.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

/// Payload for creating a product.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub recipe: RecipeInput,
}

/// Partial update of a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub status: Option<ProductStatus>,
    /// Replacing the recipe bumps its version.
    pub recipe: Option<RecipeInput>,
}

// =============================================================================
// Production Status
// =============================================================================

/// The status of a production batch.
///
/// ## State Machine
/// ```text
///                    ┌──────────────┐
///   start ─────────► │ in_progress  │
///                    └──────┬───────┘
///              complete     │     fail
///            ┌──────────────┴──────────────┐
///            ▼                             ▼
///     ┌────────────┐                ┌────────────┐
///     │ completed  │                │   failed   │
///     └────────────┘                └────────────┘
///
///     cancelled: terminal, reserved for administrative cancellation
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductionStatus {
    /// Batch is running; sub-records are editable.
    #[default]
    InProgress,
    /// Batch finished with a final quantity.
    Completed,
    /// Batch was abandoned.
    Failed,
    /// Reserved; no operation reaches it.
    Cancelled,
}

impl ProductionStatus {
    /// Terminal states accept no further mutation.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProductionStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionStatus::InProgress => "in_progress",
            ProductionStatus::Completed => "completed",
            ProductionStatus::Failed => "failed",
            ProductionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProductionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Production Sub-records
// =============================================================================

/// Ingredient line of a batch: required quantity is copied from the recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductionIngredient {
    pub name: String,
    pub required_quantity: f64,
    /// `None` until the operator records it.
    #[serde(default)]
    pub actual_quantity: Option<f64>,
    pub unit: Unit,
}

/// One pause interval of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PauseRecord {
    pub id: String,
    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,
    /// `None` while the pause is open.
    #[ts(as = "Option<String>")]
    pub end_time: Option<DateTime<Utc>>,
    /// Whole seconds, set when the pause closes.
    pub duration: Option<i64>,
    pub reason: String,
    pub category: PauseCategory,
}

impl PauseRecord {
    #[inline]
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Result of one quality check on a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QualityResult {
    pub check_name: String,
    #[serde(default)]
    pub expected_value: String,
    #[serde(default)]
    pub actual_value: String,
    #[serde(default)]
    pub result: QualityOutcome,
    #[serde(default)]
    pub notes: String,
}

// =============================================================================
// Production
// =============================================================================

/// One manufacturing run of a product's recipe.
///
/// Created only by [`crate::lifecycle::start_production`]; mutated only
/// through the lifecycle methods while `status` is `in_progress`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub id: String,
    pub batch_number: String,

    pub product_id: String,
    /// Product code at start time (frozen).
    pub product_code: String,
    /// Product name at start time (frozen).
    pub product_name: String,
    /// Recipe version at start time (frozen).
    pub recipe_version: i64,

    pub operator: String,
    pub status: ProductionStatus,

    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub end_date: Option<DateTime<Utc>>,

    pub ingredients: Vec<ProductionIngredient>,
    pub pause_history: Vec<PauseRecord>,
    pub quality_results: Vec<QualityResult>,

    /// Seconds, set on completion or failure.
    pub total_duration: Option<i64>,
    /// Sum of closed pause durations, in seconds.
    pub pause_duration: i64,
    /// Derived: `total_duration - pause_duration`, clamped at zero.
    /// Never persisted; see [`Production::refresh_net_duration`].
    pub net_duration: Option<i64>,

    pub final_quantity: Option<f64>,
    pub wastage_quantity: Option<f64>,
    pub notes: Option<String>,

    /// Optimistic concurrency counter, bumped on every write.
    pub revision: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Lifecycle Payloads
// =============================================================================

/// Payload for closing out a batch.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CompletionInput {
    pub final_quantity: f64,
    pub wastage_quantity: Option<f64>,
    pub notes: Option<String>,
    /// Client-measured duration in seconds; wall clock is used when absent.
    pub total_duration: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_status_default() {
        assert_eq!(ProductionStatus::default(), ProductionStatus::InProgress);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ProductionStatus::InProgress.is_terminal());
        assert!(ProductionStatus::Completed.is_terminal());
        assert!(ProductionStatus::Failed.is_terminal());
        assert!(ProductionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_enum_wire_spellings() {
        assert_eq!(
            serde_json::to_string(&ProductionStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&QualityOutcome::NonTeste).unwrap(),
            "\"non-testé\""
        );
        assert_eq!(
            serde_json::to_string(&QualityOutcome::NonConforme).unwrap(),
            "\"non-conforme\""
        );
        assert_eq!(serde_json::to_string(&Unit::Ml).unwrap(), "\"ml\"");

        let category: PauseCategory = serde_json::from_str("\"equipment\"").unwrap();
        assert_eq!(category, PauseCategory::Equipment);
    }

    #[test]
    fn test_quality_check_type_field_name() {
        let check: QualityCheck = serde_json::from_str(
            r#"{"name":"pH","type":"chemical","expectedValue":"6.5-7.5"}"#,
        )
        .unwrap();
        assert_eq!(check.check_type, QualityCheckType::Chemical);
        assert_eq!(check.expected_value, "6.5-7.5");
    }
}
