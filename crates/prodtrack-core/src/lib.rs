//! # prodtrack-core: Pure Business Logic for ProdTrack
//!
//! This crate is the **heart** of ProdTrack. It contains the production batch
//! state machine and everything it depends on, as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ProdTrack Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Operator / Admin Frontend                       │   │
//! │  │   Scan product ──► Start batch ──► Record ──► Complete/Fail    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP + JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    prodtrack-api (axum)                         │   │
//! │  │    handlers ──► services (load → mutate → revision write)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ prodtrack-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌───────────────┐   │   │
//! │  │  │   types   │ │ lifecycle │ │  catalog  │ │  validation   │   │   │
//! │  │  │ Product   │ │ start     │ │ recipes   │ │  quality      │   │   │
//! │  │  │Production │ │ pauses    │ │ versions  │ │  dashboard    │   │   │
//! │  │  └───────────┘ └───────────┘ └───────────┘ └───────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • CLOCK PASSED IN          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  prodtrack-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Recipe, Production, PauseRecord, ...)
//! - [`lifecycle`] - Batch state machine and pause arithmetic
//! - [`catalog`] - Product creation and recipe versioning
//! - [`quality`] - Numeric range parsing for quality checks
//! - [`dashboard`] - Admin summary aggregation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every operation takes `now` explicitly
//! 2. **No I/O**: database, network and file system access is FORBIDDEN here
//! 3. **All or nothing**: a failed operation leaves the document untouched
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use prodtrack_core::catalog::new_product;
//! use prodtrack_core::lifecycle::start_production;
//! use prodtrack_core::{CompletionInput, NewProduct, PauseCategory, RecipeInput};
//!
//! let now = Utc::now();
//! let product = new_product(
//!     NewProduct {
//!         code: "A123".into(),
//!         name: "Brioche".into(),
//!         category: "bakery".into(),
//!         recipe: RecipeInput::default(),
//!     },
//!     now,
//! )
//! .unwrap();
//!
//! let mut batch = start_production(&product, "L001", "alice", now).unwrap();
//! let pause = batch
//!     .open_pause("jam", PauseCategory::Equipment, Some(now), now)
//!     .unwrap();
//! batch
//!     .close_pause(&pause.id, Some(now + Duration::seconds(90)), now)
//!     .unwrap();
//!
//! let input = CompletionInput { final_quantity: 98.5, ..Default::default() };
//! batch.complete(input, now + Duration::seconds(3600)).unwrap();
//!
//! assert_eq!(batch.pause_duration, 90);
//! assert_eq!(batch.net_duration, Some(3510));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod lifecycle;
pub mod quality;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use dashboard::DashboardSummary;
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use quality::ValueRange;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product code or batch number.
///
/// ## Business Reason
/// Codes are printed on batch labels and scanned; longer values are almost
/// always a scanner misread.
pub const MAX_CODE_LEN: usize = 50;

/// Maximum length of a name (product, ingredient, check, operator).
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of free text (notes, pause reasons, instructions).
pub const MAX_TEXT_LEN: usize = 2000;

/// Ceiling for a caller-measured `totalDuration`, in seconds (30 days).
///
/// No batch runs this long; larger values are clock or unit errors and would
/// overflow the dashboard's sums if stored.
pub const MAX_TOTAL_DURATION_SECS: i64 = 30 * 24 * 60 * 60;
