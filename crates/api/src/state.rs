//! Shared application state

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::store::{
    MemoryRecordStore, MemoryTenantStore, PgRecordStore, PgTenantStore, RecordStore, TenantStore,
};
use crate::tenancy::{ExemptPaths, TenancyState, TenantResolver};

/// State handed to every route handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tenants: Arc<dyn TenantStore>,
    pub records: Arc<dyn RecordStore>,
    pub resolver: TenantResolver,
}

impl AppState {
    /// Build state around a concrete tenant store, which also serves the
    /// resolver's lookups
    pub fn with_stores<T>(config: Config, tenants: Arc<T>, records: Arc<dyn RecordStore>) -> Self
    where
        T: TenantStore + 'static,
    {
        let resolver = TenantResolver::new(
            tenants.clone(),
            ExemptPaths::new(&config.tenant_exempt_prefixes),
            config.tenant_lookup_timeout,
        );

        Self {
            config: Arc::new(config),
            tenants,
            records,
            resolver,
        }
    }

    /// Postgres-backed state
    pub fn postgres(config: Config, pool: PgPool) -> Self {
        let tenants = Arc::new(PgTenantStore::new(pool.clone()));
        let records = Arc::new(PgRecordStore::new(pool));
        Self::with_stores(config, tenants, records)
    }

    /// Process-local state with empty stores
    pub fn in_memory(config: Config) -> Self {
        let tenants = Arc::new(MemoryTenantStore::new());
        let records = Arc::new(MemoryRecordStore::new());
        Self::with_stores(config, tenants, records)
    }

    /// State for the tenant resolution middleware
    pub fn tenancy_state(&self) -> TenancyState {
        TenancyState {
            resolver: self.resolver.clone(),
            header: self.config.tenant_header.clone(),
        }
    }
}
