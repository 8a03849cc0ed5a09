//! # Service Layer
//!
//! Services orchestrate one request: load from `prodtrack-db`, run the pure
//! `prodtrack-core` operation with the current time, write back.
//!
//! ```text
//! handler ──► service ──► repo.get_by_id()        (NotFound if absent)
//!                     ──► core op(&mut doc, now)  (nothing written on error)
//!                     ──► repo.save(&mut doc)     (Conflict on stale revision)
//! ```
//!
//! - [`production_service::ProductionService`] - batch lifecycle
//! - [`product_service::ProductService`] - catalog and recipes

pub mod product_service;
pub mod production_service;

pub use product_service::ProductService;
pub use production_service::ProductionService;
