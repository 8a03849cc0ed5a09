//! # ProdTrack API
//!
//! HTTP server for production batch tracking.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ProdTrack API Server                             │
//! │                                                                         │
//! │  Client ──► axum Router ──► TraceLayer ──► handler                     │
//! │                                               │                         │
//! │                                  CallerRole (x-user-role)               │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                                   services (core + db)                  │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                                            SQLite                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Routes
//! ```text
//! POST   /productions                         start batch
//! GET    /productions                         list (admin, ?status=)
//! GET    /productions/{id}                    get batch
//! PUT    /productions/{id}/ingredients        replace ingredient list
//! PUT    /productions/{id}/quality            replace quality results
//! POST   /productions/{id}/pause              open pause
//! PUT    /productions/{id}/pause/{pause_id}   close pause
//! PUT    /productions/{id}/complete           complete batch
//! PUT    /productions/{id}/fail               fail batch
//! GET    /products                            list (?status=)
//! POST   /products                            create (admin)
//! GET    /products/{id}                       get
//! GET    /products/code/{code}                scan lookup
//! PUT    /products/{id}                       update / replace recipe (admin)
//! DELETE /products/{id}                       deactivate (admin)
//! GET    /dashboard                           summary (admin)
//! GET    /health                              liveness + database
//! *      anything else                        404 / 405 envelope
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod services;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    dashboard, health, method_not_allowed, product, production, route_not_found,
};

pub use crate::config::ServerConfig;
pub use crate::state::AppState;

/// Builds the full router with state and request tracing attached.
///
/// Unknown paths and unsupported methods answer with the error envelope.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/productions",
            get(production::list_productions).post(production::start_production),
        )
        .route("/productions/{id}", get(production::get_production))
        .route(
            "/productions/{id}/ingredients",
            put(production::update_ingredients),
        )
        .route("/productions/{id}/quality", put(production::update_quality))
        .route("/productions/{id}/pause", post(production::start_pause))
        .route(
            "/productions/{id}/pause/{pause_id}",
            put(production::end_pause),
        )
        .route(
            "/productions/{id}/complete",
            put(production::complete_production),
        )
        .route("/productions/{id}/fail", put(production::fail_production))
        .route(
            "/products",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/products/{id}",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::deactivate_product),
        )
        .route("/products/code/{code}", get(product::get_product_by_code))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/health", get(health::health))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
