//! HTTP handlers, one module per resource.
//!
//! Handlers stay thin: extract, check role, call a service, wrap the result
//! in the response envelope. Body and query rejections are taken as
//! `Result<_, Rejection>` so they surface in the envelope as 400s.

pub mod dashboard;
pub mod health;
pub mod product;
pub mod production;

use axum::extract::rejection::JsonRejection;
use axum::http::{Method, Uri};
use axum::Json;

use crate::error::ApiError;

/// Body of an endpoint whose fields are all optional.
///
/// A request sent without a JSON body (no `Content-Type`) gets the defaults;
/// a body that is present but malformed is still a 400.
pub(crate) fn optional_body<T: Default>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

/// Router fallback for paths no route matches.
pub async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {method} {}", uri.path()))
}

/// Router fallback for a known path called with the wrong method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{method} is not supported on {}", uri.path()))
}
