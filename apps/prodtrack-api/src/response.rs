//! # Response Envelope
//!
//! Every endpoint answers with the same JSON shape:
//!
//! ```json
//! { "success": true,  "data": { ... }, "message": "Production started" }
//! { "success": false, "error": "Production p-1 is completed, cannot complete" }
//! ```
//!
//! Absent fields are omitted rather than sent as `null`.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            message: Some(message.into()),
            ..ApiResponse::ok(data)
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_omits_absent_fields() {
        let ok = serde_json::to_value(ApiResponse::with_message(42, "done")).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "data": 42, "message": "done"}));

        let err = serde_json::to_value(ApiResponse::error("nope")).unwrap();
        assert_eq!(err, serde_json::json!({"success": false, "error": "nope"}));
    }
}
