//! Production batch endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use prodtrack_core::{
    CompletionInput, PauseCategory, ProductionIngredient, ProductionStatus, QualityResult,
};
use serde::Deserialize;

use crate::auth::CallerRole;
use crate::error::ApiError;
use crate::handlers::optional_body;
use crate::response::ApiResponse;
use crate::state::AppState;

// =============================================================================
// Request Bodies
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartProductionRequest {
    pub product_code: String,
    pub batch_number: String,
    pub operator: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIngredientsRequest {
    pub ingredients: Vec<ProductionIngredient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQualityRequest {
    pub quality_results: Vec<QualityResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseStartRequest {
    #[serde(default)]
    pub reason: String,
    pub category: PauseCategory,
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseEndRequest {
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProductionsQuery {
    pub status: Option<ProductionStatus>,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /productions
pub async fn start_production(
    State(state): State<AppState>,
    payload: Result<Json<StartProductionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let production = state
        .productions()
        .start(&req.product_code, &req.batch_number, &req.operator)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(production, "Production started"),
    ))
}

/// GET /productions/{id}
pub async fn get_production(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let production = state.productions().get(&id).await?;
    Ok(ApiResponse::ok(production))
}

/// GET /productions?status=  (admin)
pub async fn list_productions(
    State(state): State<AppState>,
    role: CallerRole,
    query: Result<Query<ListProductionsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    role.require_admin()?;
    let Query(query) = query?;
    let productions = state.productions().list(query.status).await?;
    Ok(ApiResponse::ok(productions))
}

/// PUT /productions/{id}/ingredients
pub async fn update_ingredients(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateIngredientsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let production = state
        .productions()
        .update_ingredients(&id, req.ingredients)
        .await?;
    Ok(ApiResponse::with_message(production, "Ingredients updated"))
}

/// PUT /productions/{id}/quality
pub async fn update_quality(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateQualityRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let production = state
        .productions()
        .update_quality_results(&id, req.quality_results)
        .await?;
    Ok(ApiResponse::with_message(production, "Quality results updated"))
}

/// POST /productions/{id}/pause
pub async fn start_pause(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PauseStartRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let pause = state
        .productions()
        .start_pause(&id, &req.reason, req.category, req.start_time)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(pause, "Pause recorded"),
    ))
}

/// PUT /productions/{id}/pause/{pause_id}
///
/// Body optional; without `endTime` the pause ends now.
pub async fn end_pause(
    State(state): State<AppState>,
    Path((id, pause_id)): Path<(String, String)>,
    payload: Result<Json<PauseEndRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = optional_body(payload)?;
    let pause = state
        .productions()
        .end_pause(&id, &pause_id, req.end_time)
        .await?;
    Ok(ApiResponse::with_message(pause, "Pause ended"))
}

/// PUT /productions/{id}/complete
pub async fn complete_production(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CompletionInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let production = state.productions().complete(&id, input).await?;
    Ok(ApiResponse::with_message(production, "Production completed"))
}

/// PUT /productions/{id}/fail
///
/// Body optional.
pub async fn fail_production(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<FailRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = optional_body(payload)?;
    let production = state.productions().fail(&id, req.reason).await?;
    Ok(ApiResponse::with_message(production, "Production marked as failed"))
}
