//! Admin dashboard endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use prodtrack_core::DashboardSummary;

use crate::auth::CallerRole;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /dashboard  (admin)
pub async fn dashboard(
    State(state): State<AppState>,
    role: CallerRole,
) -> Result<impl IntoResponse, ApiError> {
    role.require_admin()?;
    let productions = state.productions().list(None).await?;
    Ok(ApiResponse::ok(DashboardSummary::from_productions(&productions)))
}
