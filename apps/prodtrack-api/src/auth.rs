//! Caller role extraction.
//!
//! Authentication happens upstream; the gateway forwards the verified role
//! in `x-user-role`. This module only reads it.
//!
//! ```text
//! x-user-role: admin     → CallerRole::Admin
//! x-user-role: operator  → CallerRole::Operator
//! (missing / unknown)    → CallerRole::Operator
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::warn;

use crate::error::ApiError;

pub const ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    Admin,
    Operator,
}

impl CallerRole {
    pub fn parse(value: &str) -> Option<CallerRole> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(CallerRole::Admin),
            "operator" => Some(CallerRole::Operator),
            _ => None,
        }
    }

    /// Rejects non-admin callers with 403.
    pub fn require_admin(self) -> Result<(), ApiError> {
        match self {
            CallerRole::Admin => Ok(()),
            CallerRole::Operator => Err(ApiError::Forbidden(
                "Administrator role required".to_string(),
            )),
        }
    }
}

impl<S> FromRequestParts<S> for CallerRole
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(ROLE_HEADER) else {
            return Ok(CallerRole::Operator);
        };

        let role = raw.to_str().ok().and_then(CallerRole::parse);
        if role.is_none() {
            warn!(header = ?raw, "Unrecognized caller role, treating as operator");
        }
        Ok(role.unwrap_or(CallerRole::Operator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles() {
        assert_eq!(CallerRole::parse("admin"), Some(CallerRole::Admin));
        assert_eq!(CallerRole::parse(" Admin "), Some(CallerRole::Admin));
        assert_eq!(CallerRole::parse("operator"), Some(CallerRole::Operator));
        assert_eq!(CallerRole::parse("root"), None);
    }

    #[test]
    fn test_require_admin() {
        assert!(CallerRole::Admin.require_admin().is_ok());
        assert!(matches!(
            CallerRole::Operator.require_admin(),
            Err(ApiError::Forbidden(_))
        ));
    }
}
