//! API error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fleetdesk_shared::StoreError;
use serde_json::json;

use crate::tenancy::ResolveError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // Tenancy errors
    #[error("Tenant not found")]
    TenantNotFound { subdomain: String, path: String },
    #[error("Tenant store unavailable")]
    TenantStoreUnavailable,
    #[error("Missing tenant context")]
    MissingTenantContext,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),

    // Resource errors
    #[error("Resource not found")]
    NotFound,
    #[error("Resource already exists")]
    Conflict(String),

    // Internal errors
    #[error("Database error: {0}")]
    Database(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Tenancy
            ApiError::TenantNotFound { .. } => (StatusCode::NOT_FOUND, "TENANT_NOT_FOUND", self.to_string()),
            ApiError::TenantStoreUnavailable => (StatusCode::INTERNAL_SERVER_ERROR, "TENANT_STORE_UNAVAILABLE", "Internal server error".to_string()),
            ApiError::MissingTenantContext => (StatusCode::BAD_REQUEST, "MISSING_TENANT_CONTEXT", "Missing tenant context. Send the tenant subdomain header.".to_string()),

            // Validation
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),

            // Resources
            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),

            // Internal
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", "Database error".to_string()),
        };

        let body = match &self {
            ApiError::TenantNotFound { subdomain, path } => json!({
                "error": {
                    "code": code,
                    "message": message,
                    "debug": {
                        "subdomain": subdomain,
                        "path": path,
                    }
                }
            }),
            _ => json!({
                "error": {
                    "code": code,
                    "message": message,
                }
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Unavailable(msg) => {
                tracing::error!(error = %msg, "Store error");
                ApiError::Database(msg)
            }
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::TenantNotFound { subdomain, path } => {
                ApiError::TenantNotFound { subdomain, path }
            }
            ResolveError::StoreUnavailable => ApiError::TenantStoreUnavailable,
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
