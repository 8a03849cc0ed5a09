//! Product catalog endpoints. Reads are open to operators (they scan codes);
//! writes are admin-only.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use prodtrack_core::{NewProduct, ProductStatus, ProductUpdate};
use serde::Deserialize;

use crate::auth::CallerRole;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub status: Option<ProductStatus>,
}

/// GET /products?status=
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListProductsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let products = state.products().list(query.status).await?;
    Ok(ApiResponse::ok(products))
}

/// POST /products  (admin)
pub async fn create_product(
    State(state): State<AppState>,
    role: CallerRole,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    role.require_admin()?;
    let Json(input) = payload?;
    let product = state.products().create(input).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(product, "Product created"),
    ))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.products().get(&id).await?))
}

/// GET /products/code/{code}
pub async fn get_product_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.products().get_by_code(&code).await?))
}

/// PUT /products/{id}  (admin)
pub async fn update_product(
    State(state): State<AppState>,
    role: CallerRole,
    Path(id): Path<String>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    role.require_admin()?;
    let Json(update) = payload?;
    let product = state.products().update(&id, update).await?;
    Ok(ApiResponse::with_message(product, "Product updated"))
}

/// DELETE /products/{id}  (admin, soft delete)
pub async fn deactivate_product(
    State(state): State<AppState>,
    role: CallerRole,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    role.require_admin()?;
    let product = state.products().deactivate(&id).await?;
    Ok(ApiResponse::with_message(product, "Product deactivated"))
}
