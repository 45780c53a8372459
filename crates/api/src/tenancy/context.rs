//! Per-request tenant context
//!
//! The resolver middleware inserts a [`TenantContext`] into the request's
//! extensions once the subdomain signal has been verified against the tenant
//! store. Handlers that touch tenant-scoped data take [`RequireTenant`] as an
//! argument; it rejects the request when no tenant was resolved.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use fleetdesk_shared::{Tenant, TenantId};

use crate::error::ApiError;

/// Verified tenant scope for a single request
///
/// Only the resolver constructs this, so holding one proves the tenant
/// existed when the request arrived. Record store operations take it as
/// their mandatory filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
    subdomain: String,
}

impl TenantContext {
    pub(crate) fn from_tenant(tenant: Tenant) -> Self {
        Self {
            tenant_id: tenant.id,
            subdomain: tenant.subdomain,
        }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// The subdomain exactly as it was received and matched
    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }
}

/// Extractor for handlers that must run inside a tenant
pub struct RequireTenant(pub TenantContext);

#[async_trait]
impl<S> FromRequestParts<S> for RequireTenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .map(RequireTenant)
            .ok_or(ApiError::MissingTenantContext)
    }
}
