//! # prodtrack-db: Database Layer for ProdTrack
//!
//! This crate provides database access for ProdTrack.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ProdTrack Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (PUT /productions/{id}/complete)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Service: load ──► prodtrack-core mutate ──► save                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   prodtrack-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo    │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductionRepo │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./prodtrack.db                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, production)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prodtrack_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_path("./prodtrack.db")).await?;
//!
//! let mut batch = db.productions().get_by_id(&id).await?.ok_or(..)?;
//! batch.complete(input, Utc::now())?;
//! db.productions().save(&mut batch).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbLocation};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::production::ProductionRepository;
