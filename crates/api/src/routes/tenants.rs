//! Tenant administration routes
//!
//! These run before any tenant exists, so they are on the resolver's
//! exempt list.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use fleetdesk_shared::{Tenant, TenantId};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    store::NewTenant,
};

/// Subdomains that collide with platform hosts and cannot be assigned
pub const RESERVED_SUBDOMAINS: &[&str] = &["api", "www", "admin", "app", "mail", "status", "health"];

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateTenantRequest {
    pub subdomain: String,
    pub name: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Provision a new tenant
pub async fn create_tenant(
    State(state): State<AppState>,
    Json(req): Json<CreateTenantRequest>,
) -> ApiResult<(StatusCode, Json<Tenant>)> {
    let name = req.name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(ApiError::Validation(
            "Tenant name must be between 1 and 100 characters".to_string(),
        ));
    }

    // Stored exactly as given; the resolver matches case-sensitively
    validate_subdomain(&req.subdomain)?;

    let tenant = state
        .tenants
        .create_tenant(NewTenant {
            subdomain: req.subdomain,
            name: name.to_string(),
        })
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                ApiError::Conflict("This subdomain is already taken".to_string())
            }
            other => other,
        })?;

    tracing::info!(tenant_id = %tenant.id, subdomain = %tenant.subdomain, "Tenant created");

    Ok((StatusCode::CREATED, Json(tenant)))
}

/// List all tenants
pub async fn list_tenants(State(state): State<AppState>) -> ApiResult<Json<Vec<Tenant>>> {
    let tenants = state.tenants.list_tenants().await?;
    Ok(Json(tenants))
}

/// Get a tenant by ID
pub async fn get_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<Tenant>> {
    let tenant = state
        .tenants
        .get_tenant(TenantId(tenant_id))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(tenant))
}

// =============================================================================
// Subdomain Validation
// =============================================================================

fn validate_subdomain(subdomain: &str) -> Result<(), ApiError> {
    // Length: 3-50 characters
    if subdomain.len() < 3 || subdomain.len() > 50 {
        return Err(ApiError::Validation(
            "Subdomain must be between 3 and 50 characters".to_string(),
        ));
    }

    // Format: lowercase letters, numbers, hyphens only
    if !subdomain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ApiError::Validation(
            "Subdomain can only contain lowercase letters, numbers, and hyphens".to_string(),
        ));
    }

    // No starting/ending hyphen
    if subdomain.starts_with('-') || subdomain.ends_with('-') {
        return Err(ApiError::Validation(
            "Subdomain cannot start or end with a hyphen".to_string(),
        ));
    }

    // No consecutive hyphens
    if subdomain.contains("--") {
        return Err(ApiError::Validation(
            "Subdomain cannot contain consecutive hyphens".to_string(),
        ));
    }

    if RESERVED_SUBDOMAINS.contains(&subdomain) {
        return Err(ApiError::Validation(
            "This subdomain is reserved and cannot be used".to_string(),
        ));
    }

    Ok(())
}
