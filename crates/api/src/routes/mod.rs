//! API routes

pub mod health;
pub mod records;
pub mod tenants;


use axum::{middleware, routing::get, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{error::ApiError, state::AppState, tenancy::resolve_tenant};

/// Create all API routes
///
/// Tenant resolution wraps every route; the health and tenant administration
/// routes are on its exempt list.
pub fn create_router(state: AppState) -> Router {
    let tenancy_state = state.tenancy_state();

    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // Tenant administration
    let tenant_routes = Router::new()
        .route(
            "/api/v1/tenants",
            get(tenants::list_tenants).post(tenants::create_tenant),
        )
        .route("/api/v1/tenants/:tenant_id", get(tenants::get_tenant));

    // Tenant-scoped records
    let record_routes = Router::new()
        .route(
            "/api/v1/records/:kind",
            get(records::list_records).post(records::create_record),
        )
        .route(
            "/api/v1/records/:kind/:record_id",
            get(records::get_record)
                .patch(records::update_record)
                .delete(records::delete_record),
        );

    Router::new()
        .merge(health_routes)
        .merge(tenant_routes)
        .merge(record_routes)
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(tenancy_state, resolve_tenant))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound
}
