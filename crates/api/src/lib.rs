//! FleetDesk API Library
//!
//! This crate contains the API server components for FleetDesk: tenant
//! resolution, storage collaborators, and the HTTP routes built on them.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod tenancy;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
pub use tenancy::{RequireTenant, TenantContext, TenantResolver};
