//! Error types for the service and their HTTP mapping.
//!
//! - [`LinkError`] is returned by the link and redirect services and carries
//!   the domain meaning of a failure.
//! - [`AppError`] is the HTTP-facing error; every handler returns it and it
//!   renders as `{"error": {"code", "message", "details"}}`.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;

/// Failures of link creation and resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error(
        "Custom alias must be 3-20 characters and contain only letters, numbers, hyphens, and underscores"
    )]
    InvalidAlias(String),

    #[error("Expiration date must be in the future")]
    InvalidExpiry,

    #[error("Custom alias already exists")]
    AliasTaken(String),

    #[error("Failed to generate a unique code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    #[error("Short link not found")]
    NotFound(String),

    #[error("Short link has expired")]
    Expired(String),

    #[error("Expiry retention of {seconds}s reaches before the earliest representable time")]
    RetentionOutOfRange { seconds: i64 },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for LinkError {
    fn from(e: StoreError) -> Self {
        Self::StoreUnavailable(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Error payload nested under `"error"` in every error response.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    Unauthorized { message: String, details: Value },
    NotFound { message: String, details: Value },
    Gone { message: String, details: Value },
    TooManyRequests { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn gone(message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            message: message.into(),
            details,
        }
    }
    pub fn too_many_requests(message: impl Into<String>, details: Value) -> Self {
        Self::TooManyRequests {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Gone { .. } => StatusCode::GONE,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts into the serializable error payload.
    pub fn into_error_info(self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::Unauthorized { message, details } => ("unauthorized", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Gone { message, details } => ("gone", message, details),
            AppError::TooManyRequests { message, details } => ("rate_limited", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            AppError::Validation { message, .. }
            | AppError::Unauthorized { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Gone { message, .. }
            | AppError::TooManyRequests { message, .. }
            | AppError::Internal { message, .. } => message,
        };
        f.write_str(message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let unauthorized = status == StatusCode::UNAUTHORIZED;

        let body = ErrorBody {
            error: self.into_error_info(),
        };

        if unauthorized {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], Json(body)).into_response();
        }

        (status, Json(body)).into_response()
    }
}

impl From<LinkError> for AppError {
    fn from(e: LinkError) -> Self {
        let message = e.to_string();
        match e {
            LinkError::InvalidUrl(reason) => AppError::bad_request(
                message,
                json!({ "reason": "invalid_url", "detail": reason }),
            ),
            LinkError::InvalidAlias(alias) => AppError::bad_request(
                message,
                json!({ "reason": "invalid_alias", "alias": alias }),
            ),
            LinkError::InvalidExpiry => {
                AppError::bad_request(message, json!({ "reason": "invalid_expiry" }))
            }
            LinkError::AliasTaken(alias) => AppError::bad_request(
                message,
                json!({ "reason": "alias_taken", "alias": alias }),
            ),
            LinkError::GenerationExhausted { attempts } => AppError::internal(
                message,
                json!({ "reason": "generation_exhausted", "attempts": attempts }),
            ),
            LinkError::NotFound(key) => AppError::not_found(message, json!({ "code": key })),
            LinkError::Expired(key) => AppError::gone(message, json!({ "code": key })),
            LinkError::RetentionOutOfRange { seconds } => AppError::internal(
                message,
                json!({ "reason": "retention_out_of_range", "seconds": seconds }),
            ),
            LinkError::StoreUnavailable(_) => {
                AppError::internal("Database error", json!({ "reason": "store_unavailable" }))
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict { constraint } => AppError::bad_request(
                "Unique constraint violation",
                json!({ "constraint": constraint }),
            ),
            StoreError::Unavailable(_) => AppError::internal("Database error", json!({})),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(e.field_errors()).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Validation failed", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_error_status_mapping() {
        let cases = [
            (LinkError::InvalidUrl("x".into()), StatusCode::BAD_REQUEST),
            (LinkError::InvalidAlias("a".into()), StatusCode::BAD_REQUEST),
            (LinkError::InvalidExpiry, StatusCode::BAD_REQUEST),
            (LinkError::AliasTaken("promo".into()), StatusCode::BAD_REQUEST),
            (
                LinkError::GenerationExhausted { attempts: 10 },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (LinkError::NotFound("nope".into()), StatusCode::NOT_FOUND),
            (LinkError::Expired("old".into()), StatusCode::GONE),
            (
                LinkError::RetentionOutOfRange { seconds: i64::MAX },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                LinkError::StoreUnavailable("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_expired_and_not_found_are_distinct() {
        let expired = AppError::from(LinkError::Expired("k".into())).into_error_info();
        let missing = AppError::from(LinkError::NotFound("k".into())).into_error_info();
        assert_eq!(expired.code, "gone");
        assert_eq!(missing.code, "not_found");
    }

    #[test]
    fn test_alias_taken_details() {
        let info = AppError::from(LinkError::AliasTaken("promo".into())).into_error_info();
        assert_eq!(info.code, "validation_error");
        assert_eq!(info.details["reason"], "alias_taken");
        assert_eq!(info.details["alias"], "promo");
    }

    #[test]
    fn test_store_unavailable_hides_driver_message() {
        let info = AppError::from(LinkError::StoreUnavailable(
            "connection refused at 10.0.0.5".into(),
        ))
        .into_error_info();
        assert!(!info.details.to_string().contains("10.0.0.5"));
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let response = AppError::unauthorized("Unauthorized", json!({})).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
