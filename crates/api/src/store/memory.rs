//! In-memory stores for local runs and tests

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use fleetdesk_shared::{Record, RecordId, RecordKind, StoreError, Tenant, TenantId};
use time::OffsetDateTime;

use super::{NewTenant, RecordStore, TenantLookup, TenantStore};
use crate::tenancy::TenantContext;

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

/// Thread-safe in-memory tenant store
#[derive(Default)]
pub struct MemoryTenantStore {
    /// Insertion order doubles as creation order
    tenants: RwLock<Vec<Tenant>>,
}

impl MemoryTenantStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantLookup for MemoryTenantStore {
    async fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<Tenant>, StoreError> {
        let tenants = self.tenants.read().map_err(|_| poisoned())?;
        Ok(tenants.iter().find(|t| t.subdomain == subdomain).cloned())
    }
}

#[async_trait]
impl TenantStore for MemoryTenantStore {
    async fn create_tenant(&self, new: NewTenant) -> Result<Tenant, StoreError> {
        let mut tenants = self.tenants.write().map_err(|_| poisoned())?;
        if tenants.iter().any(|t| t.subdomain == new.subdomain) {
            return Err(StoreError::Conflict(format!(
                "subdomain '{}' is already assigned",
                new.subdomain
            )));
        }

        let tenant = Tenant {
            id: TenantId::new(),
            subdomain: new.subdomain,
            name: new.name,
            created_at: OffsetDateTime::now_utc(),
        };
        tenants.push(tenant.clone());
        Ok(tenant)
    }

    async fn get_tenant(&self, id: TenantId) -> Result<Option<Tenant>, StoreError> {
        let tenants = self.tenants.read().map_err(|_| poisoned())?;
        Ok(tenants.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tenants(&self) -> Result<Vec<Tenant>, StoreError> {
        let tenants = self.tenants.read().map_err(|_| poisoned())?;
        Ok(tenants.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.tenants.read().map_err(|_| poisoned())?;
        Ok(())
    }
}

/// Thread-safe in-memory record store
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<RecordId, Record>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn visible(record: &Record, scope: &TenantContext, kind: RecordKind) -> bool {
    record.tenant_id == scope.tenant_id() && record.kind == kind
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create_record(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
        data: serde_json::Value,
    ) -> Result<Record, StoreError> {
        let now = OffsetDateTime::now_utc();
        let record = Record {
            id: RecordId::new(),
            tenant_id: scope.tenant_id(),
            kind,
            data,
            created_at: now,
            updated_at: now,
        };

        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_record(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<Option<Record>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records
            .get(&id)
            .filter(|r| visible(r, scope, kind))
            .cloned())
    }

    async fn list_records(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
    ) -> Result<Vec<Record>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        let mut matching: Vec<Record> = records
            .values()
            .filter(|r| visible(r, scope, kind))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(matching)
    }

    async fn update_record(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
        id: RecordId,
        data: serde_json::Value,
    ) -> Result<Option<Record>, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let Some(record) = records.get_mut(&id).filter(|r| visible(r, scope, kind)) else {
            return Ok(None);
        };
        record.data = data;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(Some(record.clone()))
    }

    async fn delete_record(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records.get(&id).is_some_and(|r| visible(r, scope, kind)) {
            records.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn tenant(store: &MemoryTenantStore, subdomain: &str) -> TenantContext {
        let tenant = store
            .create_tenant(NewTenant {
                subdomain: subdomain.to_string(),
                name: subdomain.to_string(),
            })
            .await
            .unwrap();
        TenantContext::from_tenant(tenant)
    }

    #[tokio::test]
    async fn test_tenant_subdomain_is_unique() {
        let store = MemoryTenantStore::new();
        tenant(&store, "acme").await;

        let dup = store
            .create_tenant(NewTenant {
                subdomain: "acme".to_string(),
                name: "Other Acme".to_string(),
            })
            .await;
        assert!(matches!(dup, Err(StoreError::Conflict(_))));
        assert_eq!(store.list_tenants().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_subdomain_is_exact() {
        let store = MemoryTenantStore::new();
        let acme = tenant(&store, "acme").await;

        let found = store.find_by_subdomain("acme").await.unwrap().unwrap();
        assert_eq!(found.id, acme.tenant_id());
        assert!(store.find_by_subdomain("ACME").await.unwrap().is_none());
        assert!(store.find_by_subdomain("acme ").await.unwrap().is_none());
        assert!(store.find_by_subdomain("acm").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_tenants_in_creation_order() {
        let store = MemoryTenantStore::new();
        tenant(&store, "acme").await;
        tenant(&store, "globex").await;
        tenant(&store, "initech").await;

        let subdomains: Vec<String> = store
            .list_tenants()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.subdomain)
            .collect();
        assert_eq!(subdomains, vec!["acme", "globex", "initech"]);
    }

    #[tokio::test]
    async fn test_records_invisible_across_tenants() {
        let tenants = MemoryTenantStore::new();
        let records = MemoryRecordStore::new();
        let acme = tenant(&tenants, "acme").await;
        let globex = tenant(&tenants, "globex").await;

        let driver = records
            .create_record(&globex, RecordKind::Driver, json!({"name": "Hank"}))
            .await
            .unwrap();

        assert!(records
            .get_record(&acme, RecordKind::Driver, driver.id)
            .await
            .unwrap()
            .is_none());
        assert!(records
            .list_records(&acme, RecordKind::Driver)
            .await
            .unwrap()
            .is_empty());
        assert!(records
            .update_record(&acme, RecordKind::Driver, driver.id, json!({"name": "Hijacked"}))
            .await
            .unwrap()
            .is_none());
        assert!(!records
            .delete_record(&acme, RecordKind::Driver, driver.id)
            .await
            .unwrap());

        let still_there = records
            .get_record(&globex, RecordKind::Driver, driver.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(still_there.data, json!({"name": "Hank"}));
    }

    #[tokio::test]
    async fn test_records_filtered_by_kind() {
        let tenants = MemoryTenantStore::new();
        let records = MemoryRecordStore::new();
        let acme = tenant(&tenants, "acme").await;

        let van = records
            .create_record(&acme, RecordKind::Vehicle, json!({"plate": "AC-1"}))
            .await
            .unwrap();

        assert!(records
            .get_record(&acme, RecordKind::Driver, van.id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(records.list_records(&acme, RecordKind::Vehicle).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_own_record() {
        let tenants = MemoryTenantStore::new();
        let records = MemoryRecordStore::new();
        let acme = tenant(&tenants, "acme").await;

        let order = records
            .create_record(&acme, RecordKind::Order, json!({"status": "new"}))
            .await
            .unwrap();
        let updated = records
            .update_record(&acme, RecordKind::Order, order.id, json!({"status": "shipped"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.data["status"], "shipped");
        assert!(updated.updated_at >= order.updated_at);

        assert!(records.delete_record(&acme, RecordKind::Order, order.id).await.unwrap());
        assert!(!records.delete_record(&acme, RecordKind::Order, order.id).await.unwrap());
    }
}
