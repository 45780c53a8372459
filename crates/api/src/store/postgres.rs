//! Postgres-backed stores

use async_trait::async_trait;
use fleetdesk_shared::{Record, RecordId, RecordKind, StoreError, Tenant, TenantId};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{NewTenant, RecordStore, TenantLookup, TenantStore};
use crate::tenancy::TenantContext;

/// Tenants table access
#[derive(Clone)]
pub struct PgTenantStore {
    pool: PgPool,
}

impl PgTenantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantLookup for PgTenantStore {
    async fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<Tenant>, StoreError> {
        let tenant: Option<Tenant> = sqlx::query_as(
            "SELECT id, subdomain, name, created_at FROM tenants WHERE subdomain = $1",
        )
        .bind(subdomain)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant)
    }
}

#[async_trait]
impl TenantStore for PgTenantStore {
    async fn create_tenant(&self, new: NewTenant) -> Result<Tenant, StoreError> {
        let tenant: Tenant = sqlx::query_as(
            r#"
            INSERT INTO tenants (id, subdomain, name, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, subdomain, name, created_at
            "#,
        )
        .bind(TenantId::new())
        .bind(&new.subdomain)
        .bind(&new.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(tenant)
    }

    async fn get_tenant(&self, id: TenantId) -> Result<Option<Tenant>, StoreError> {
        let tenant: Option<Tenant> =
            sqlx::query_as("SELECT id, subdomain, name, created_at FROM tenants WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(tenant)
    }

    async fn list_tenants(&self) -> Result<Vec<Tenant>, StoreError> {
        let tenants: Vec<Tenant> = sqlx::query_as(
            "SELECT id, subdomain, name, created_at FROM tenants ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tenants)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: Uuid,
    tenant_id: Uuid,
    data: serde_json::Value,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl RecordRow {
    fn into_record(self, kind: RecordKind) -> Record {
        Record {
            id: RecordId(self.id),
            tenant_id: TenantId(self.tenant_id),
            kind,
            data: self.data,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Tenant-scoped records table access
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create_record(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
        data: serde_json::Value,
    ) -> Result<Record, StoreError> {
        let row: RecordRow = sqlx::query_as(
            r#"
            INSERT INTO tenant_records (id, tenant_id, kind, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, tenant_id, data, created_at, updated_at
            "#,
        )
        .bind(RecordId::new())
        .bind(scope.tenant_id())
        .bind(kind.to_string())
        .bind(&data)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_record(kind))
    }

    async fn get_record(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<Option<Record>, StoreError> {
        let row: Option<RecordRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, data, created_at, updated_at
            FROM tenant_records
            WHERE tenant_id = $1 AND kind = $2 AND id = $3
            "#,
        )
        .bind(scope.tenant_id())
        .bind(kind.to_string())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_record(kind)))
    }

    async fn list_records(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
    ) -> Result<Vec<Record>, StoreError> {
        let rows: Vec<RecordRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, data, created_at, updated_at
            FROM tenant_records
            WHERE tenant_id = $1 AND kind = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(scope.tenant_id())
        .bind(kind.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_record(kind)).collect())
    }

    async fn update_record(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
        id: RecordId,
        data: serde_json::Value,
    ) -> Result<Option<Record>, StoreError> {
        let row: Option<RecordRow> = sqlx::query_as(
            r#"
            UPDATE tenant_records
            SET data = $4, updated_at = NOW()
            WHERE tenant_id = $1 AND kind = $2 AND id = $3
            RETURNING id, tenant_id, data, created_at, updated_at
            "#,
        )
        .bind(scope.tenant_id())
        .bind(kind.to_string())
        .bind(id)
        .bind(&data)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_record(kind)))
    }

    async fn delete_record(
        &self,
        scope: &TenantContext,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "DELETE FROM tenant_records WHERE tenant_id = $1 AND kind = $2 AND id = $3",
        )
        .bind(scope.tenant_id())
        .bind(kind.to_string())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
