//! Storage collaborators
//!
//! Tenants and tenant-scoped records are reached through trait objects so the
//! resolver and handlers can run against Postgres in production and an
//! in-memory store in tests and local runs.

mod memory;
mod postgres;

use async_trait::async_trait;
use fleetdesk_shared::{Record, RecordId, RecordKind, StoreError, Tenant, TenantId};

use crate::tenancy::TenantContext;

pub use memory::{MemoryRecordStore, MemoryTenantStore};
pub use postgres::{PgRecordStore, PgTenantStore};

/// The single lookup the tenant resolver needs
#[async_trait]
pub trait TenantLookup: Send + Sync {
    /// Find the tenant whose subdomain equals `subdomain` exactly.
    ///
    /// Absence is `Ok(None)`, never an error.
    async fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<Tenant>, StoreError>;
}

/// Fields supplied when provisioning a tenant
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub subdomain: String,
    pub name: String,
}

/// Tenant administration
#[async_trait]
pub trait TenantStore: TenantLookup {
    /// Insert a tenant; a taken subdomain is `StoreError::Conflict`
    async fn create_tenant(&self, new: NewTenant) -> Result<Tenant, StoreError>;

    async fn get_tenant(&self, id: TenantId) -> Result<Option<Tenant>, StoreError>;

    /// All tenants, oldest first
    async fn list_tenants(&self) -> Result<Vec<Tenant>, StoreError>;

    /// Cheap round-trip used by readiness probes
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Tenant-scoped business records
///
/// Every operation is filtered by `scope.tenant_id()`; a record owned by
/// another tenant behaves exactly like a missing one.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_record(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
        data: serde_json::Value,
    ) -> Result<Record, StoreError>;

    async fn get_record(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<Option<Record>, StoreError>;

    async fn list_records(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
    ) -> Result<Vec<Record>, StoreError>;

    /// Replace the record's data, returning `None` when it is not visible
    async fn update_record(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
        id: RecordId,
        data: serde_json::Value,
    ) -> Result<Option<Record>, StoreError>;

    /// Returns whether a record was removed
    async fn delete_record(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<bool, StoreError>;
}
