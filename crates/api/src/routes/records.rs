//! Tenant-scoped record routes (drivers, vehicles, orders, ...)
//!
//! Every handler takes [`RequireTenant`]; the record store filters each query
//! by the resolved tenant, so another tenant's record is reported as missing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use fleetdesk_shared::{Record, RecordId, RecordKind};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    tenancy::RequireTenant,
};

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RecordBody {
    pub data: serde_json::Value,
}

fn parse_kind(segment: &str) -> ApiResult<RecordKind> {
    RecordKind::from_path_segment(segment)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown record kind: {}", segment)))
}

fn require_object(data: &serde_json::Value) -> ApiResult<()> {
    if data.is_object() {
        Ok(())
    } else {
        Err(ApiError::Validation("Record data must be a JSON object".to_string()))
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List the tenant's records of one kind
pub async fn list_records(
    State(state): State<AppState>,
    RequireTenant(tenant): RequireTenant,
    Path(kind): Path<String>,
) -> ApiResult<Json<Vec<Record>>> {
    let kind = parse_kind(&kind)?;
    let records = state.records.list_records(&tenant, kind).await?;
    Ok(Json(records))
}

/// Create a record for the tenant
pub async fn create_record(
    State(state): State<AppState>,
    RequireTenant(tenant): RequireTenant,
    Path(kind): Path<String>,
    Json(body): Json<RecordBody>,
) -> ApiResult<(StatusCode, Json<Record>)> {
    let kind = parse_kind(&kind)?;
    require_object(&body.data)?;

    let record = state.records.create_record(&tenant, kind, body.data).await?;
    tracing::debug!(tenant_id = %tenant.tenant_id(), %kind, record_id = %record.id.0, "Record created");

    Ok((StatusCode::CREATED, Json(record)))
}

/// Get one of the tenant's records
pub async fn get_record(
    State(state): State<AppState>,
    RequireTenant(tenant): RequireTenant,
    Path((kind, record_id)): Path<(String, Uuid)>,
) -> ApiResult<Json<Record>> {
    let kind = parse_kind(&kind)?;
    let record = state
        .records
        .get_record(&tenant, kind, RecordId(record_id))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(record))
}

/// Replace the data of one of the tenant's records
pub async fn update_record(
    State(state): State<AppState>,
    RequireTenant(tenant): RequireTenant,
    Path((kind, record_id)): Path<(String, Uuid)>,
    Json(body): Json<RecordBody>,
) -> ApiResult<Json<Record>> {
    let kind = parse_kind(&kind)?;
    require_object(&body.data)?;

    let record = state
        .records
        .update_record(&tenant, kind, RecordId(record_id), body.data)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(record))
}

/// Delete one of the tenant's records
pub async fn delete_record(
    State(state): State<AppState>,
    RequireTenant(tenant): RequireTenant,
    Path((kind, record_id)): Path<(String, Uuid)>,
) -> ApiResult<StatusCode> {
    let kind = parse_kind(&kind)?;
    if state
        .records
        .delete_record(&tenant, kind, RecordId(record_id))
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
