//! Multi-tenant request scoping
//!
//! Every request may carry a subdomain signal (the `x-tenant-subdomain`
//! header by default). The resolver maps it to a verified tenant and the
//! middleware attaches the result to the request, so that handlers filter
//! every tenant-scoped query by it:
//! - acme request -> `TenantContext { tenant_id: <acme>, subdomain: "acme" }`
//! - tenant administration and health routes -> no tenant, by allow-list
//! - unknown subdomain -> 404 before any handler runs

mod context;
mod exempt;
mod middleware;
mod resolver;

pub use context::{RequireTenant, TenantContext};
pub use exempt::ExemptPaths;
pub use middleware::{resolve_tenant, TenancyState};
pub use resolver::{BypassReason, Resolution, ResolveError, Signal, TenantResolver};
