//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use tracing::warn;

use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    pub migrations_total: usize,
    pub migrations_applied: usize,
}

/// GET /health
///
/// 200 when the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = state.db.health_check().await;
    let (migrations_total, migrations_applied) = if database {
        state.db.migration_status().await.unwrap_or((0, 0))
    } else {
        (0, 0)
    };

    let status = HealthStatus {
        status: if database { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        migrations_total,
        migrations_applied,
    };

    if database {
        (StatusCode::OK, ApiResponse::ok(status))
    } else {
        warn!("Health check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            ApiResponse {
                success: false,
                data: Some(status),
                message: None,
                error: Some("Database unavailable".to_string()),
            },
        )
    }
}
