//! Subdomain-to-Tenant Resolution
//!
//! Decides, for one inbound request, which tenant's data it may access:
//! - exempt route (tenant administration, health) -> bypass
//! - no subdomain signal -> bypass
//! - signal matches a tenant exactly -> resolved
//! - signal matches nothing, or several signals were sent -> `TenantNotFound`
//! - store failure or timeout -> `StoreUnavailable`
//!
//! There is no cache; every request performs exactly one lookup so tenant
//! changes are observed immediately.

use std::sync::Arc;
use std::time::Duration;

use crate::store::TenantLookup;

use super::{ExemptPaths, TenantContext};

/// Why resolution was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassReason {
    ExemptPath,
    NoSignal,
}

/// Successful outcome of resolving one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(TenantContext),
    Bypassed(BypassReason),
}

/// The raw subdomain signal as carried by the request
#[derive(Debug, Clone, Copy)]
pub enum Signal<'a> {
    Absent,
    Present(&'a str),
    /// Header bytes that are not visible ASCII
    Malformed(&'a [u8]),
    /// The header was sent more than once; values joined with ", "
    Conflicting(&'a str),
}

/// Tenant resolver shared by all in-flight requests
#[derive(Clone)]
pub struct TenantResolver {
    store: Arc<dyn TenantLookup>,
    exempt: ExemptPaths,
    lookup_timeout: Duration,
}

impl TenantResolver {
    pub fn new(store: Arc<dyn TenantLookup>, exempt: ExemptPaths, lookup_timeout: Duration) -> Self {
        Self {
            store,
            exempt,
            lookup_timeout,
        }
    }

    pub fn exempt_paths(&self) -> &ExemptPaths {
        &self.exempt
    }

    /// Resolve the tenant for a request with the given signal and path
    pub async fn resolve(&self, signal: Signal<'_>, path: &str) -> Result<Resolution, ResolveError> {
        if self.exempt.is_exempt(path) {
            tracing::debug!(path, "Tenant resolution bypassed for exempt path");
            return Ok(Resolution::Bypassed(BypassReason::ExemptPath));
        }

        let subdomain = match signal {
            Signal::Absent | Signal::Present("") => {
                tracing::debug!(path, "No tenant signal, continuing without tenant");
                return Ok(Resolution::Bypassed(BypassReason::NoSignal));
            }
            Signal::Present(subdomain) => subdomain,
            Signal::Malformed(bytes) => {
                let subdomain = String::from_utf8_lossy(bytes).into_owned();
                tracing::warn!(%subdomain, path, "Malformed tenant signal");
                return Err(ResolveError::TenantNotFound {
                    subdomain,
                    path: path.to_string(),
                });
            }
            Signal::Conflicting(subdomains) => {
                tracing::warn!(subdomains, path, "Conflicting tenant signals");
                return Err(ResolveError::TenantNotFound {
                    subdomain: subdomains.to_string(),
                    path: path.to_string(),
                });
            }
        };

        let lookup = tokio::time::timeout(self.lookup_timeout, self.store.find_by_subdomain(subdomain));
        match lookup.await {
            Ok(Ok(Some(tenant))) => {
                let ctx = TenantContext::from_tenant(tenant);
                tracing::debug!(tenant_id = %ctx.tenant_id(), subdomain, "Tenant resolved");
                Ok(Resolution::Resolved(ctx))
            }
            Ok(Ok(None)) => {
                tracing::warn!(subdomain, path, "Tenant not found");
                Err(ResolveError::TenantNotFound {
                    subdomain: subdomain.to_string(),
                    path: path.to_string(),
                })
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, subdomain, "Tenant lookup failed");
                Err(ResolveError::StoreUnavailable)
            }
            Err(_) => {
                tracing::error!(
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    subdomain,
                    "Tenant lookup timed out"
                );
                Err(ResolveError::StoreUnavailable)
            }
        }
    }
}

/// Errors that reject a request during tenant resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Tenant not found: {subdomain} (path {path})")]
    TenantNotFound { subdomain: String, path: String },

    #[error("Tenant store unavailable")]
    StoreUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EXEMPT_PREFIXES;
    use crate::store::{MemoryTenantStore, NewTenant, TenantStore};
    use async_trait::async_trait;
    use fleetdesk_shared::{StoreError, Tenant};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that counts lookups and can be told to fail or hang
    struct FakeStore {
        inner: MemoryTenantStore,
        lookups: AtomicUsize,
        mode: FakeMode,
    }

    enum FakeMode {
        Normal,
        Failing,
        Hanging,
    }

    impl FakeStore {
        fn new(mode: FakeMode) -> Arc<Self> {
            Arc::new(Self {
                inner: MemoryTenantStore::new(),
                lookups: AtomicUsize::new(0),
                mode,
            })
        }

        async fn add(&self, subdomain: &str) -> Tenant {
            self.inner
                .create_tenant(NewTenant {
                    subdomain: subdomain.to_string(),
                    name: subdomain.to_string(),
                })
                .await
                .unwrap()
        }
    }

    #[async_trait]
    impl TenantLookup for FakeStore {
        async fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<Tenant>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            match self.mode {
                FakeMode::Normal => self.inner.find_by_subdomain(subdomain).await,
                FakeMode::Failing => Err(StoreError::Unavailable(
                    "connection refused (10.0.0.5:5432)".to_string(),
                )),
                FakeMode::Hanging => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(None)
                }
            }
        }
    }

    fn resolver(store: Arc<FakeStore>) -> TenantResolver {
        TenantResolver::new(
            store,
            ExemptPaths::new(DEFAULT_EXEMPT_PREFIXES),
            Duration::from_millis(50),
        )
    }

    #[tokio::test]
    async fn test_exempt_paths_bypass_regardless_of_signal() {
        let store = FakeStore::new(FakeMode::Normal);
        let resolver = resolver(store.clone());

        for signal in [
            Signal::Absent,
            Signal::Present(""),
            Signal::Present("no-such-tenant"),
            Signal::Malformed(b"\xff\xfe"),
            Signal::Conflicting("acme, globex"),
        ] {
            for path in ["/api/v1/tenants", "/api/v1/tenants/abc", "/health", "/health/ready"] {
                assert_eq!(
                    resolver.resolve(signal, path).await,
                    Ok(Resolution::Bypassed(BypassReason::ExemptPath))
                );
            }
        }
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_signal_bypasses() {
        let store = FakeStore::new(FakeMode::Normal);
        let resolver = resolver(store.clone());

        assert_eq!(
            resolver.resolve(Signal::Absent, "/api/v1/records/drivers").await,
            Ok(Resolution::Bypassed(BypassReason::NoSignal))
        );
        assert_eq!(
            resolver.resolve(Signal::Present(""), "/api/v1/records/drivers").await,
            Ok(Resolution::Bypassed(BypassReason::NoSignal))
        );
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_matching_signal_resolves() {
        let store = FakeStore::new(FakeMode::Normal);
        let acme = store.add("acme").await;
        let resolver = resolver(store.clone());

        let Ok(Resolution::Resolved(ctx)) = resolver
            .resolve(Signal::Present("acme"), "/api/v1/records/drivers")
            .await
        else {
            panic!("expected acme to resolve");
        };
        assert_eq!(ctx.tenant_id(), acme.id);
        assert_eq!(ctx.subdomain(), "acme");
        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_signal_is_not_found_with_diagnostics() {
        let store = FakeStore::new(FakeMode::Normal);
        store.add("acme").await;
        let resolver = resolver(store);

        let result = resolver
            .resolve(Signal::Present("initech"), "/api/v1/records/orders")
            .await;
        assert_eq!(
            result,
            Err(ResolveError::TenantNotFound {
                subdomain: "initech".to_string(),
                path: "/api/v1/records/orders".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_signal_match_is_case_sensitive() {
        let store = FakeStore::new(FakeMode::Normal);
        store.add("acme").await;
        let resolver = resolver(store);

        let result = resolver
            .resolve(Signal::Present("ACME"), "/api/v1/records/drivers")
            .await;
        assert!(matches!(
            result,
            Err(ResolveError::TenantNotFound { ref subdomain, .. }) if subdomain == "ACME"
        ));
    }

    #[tokio::test]
    async fn test_malformed_signal_is_rejected() {
        let store = FakeStore::new(FakeMode::Normal);
        let resolver = resolver(store.clone());

        let result = resolver
            .resolve(Signal::Malformed(b"acm\xe9"), "/api/v1/records/drivers")
            .await;
        assert!(matches!(result, Err(ResolveError::TenantNotFound { .. })));
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_conflicting_signals_are_rejected_without_lookup() {
        let store = FakeStore::new(FakeMode::Normal);
        store.add("acme").await;
        let resolver = resolver(store.clone());

        let result = resolver
            .resolve(Signal::Conflicting("acme, globex"), "/api/v1/records/drivers")
            .await;
        assert_eq!(
            result,
            Err(ResolveError::TenantNotFound {
                subdomain: "acme, globex".to_string(),
                path: "/api/v1/records/drivers".to_string(),
            })
        );
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent_and_uncached() {
        let store = FakeStore::new(FakeMode::Normal);
        store.add("acme").await;
        let resolver = resolver(store.clone());

        let first = resolver.resolve(Signal::Present("acme"), "/api/v1/records/drivers").await;
        let second = resolver.resolve(Signal::Present("acme"), "/api/v1/records/drivers").await;
        assert!(matches!(first, Ok(Resolution::Resolved(_))));
        assert_eq!(first, second);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_newly_created_tenant_is_seen_immediately() {
        let store = FakeStore::new(FakeMode::Normal);
        let resolver = resolver(store.clone());

        assert!(resolver
            .resolve(Signal::Present("globex"), "/api/v1/records/drivers")
            .await
            .is_err());
        store.add("globex").await;
        assert!(matches!(
            resolver.resolve(Signal::Present("globex"), "/api/v1/records/drivers").await,
            Ok(Resolution::Resolved(_))
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let store = FakeStore::new(FakeMode::Failing);
        let resolver = resolver(store);

        assert_eq!(
            resolver.resolve(Signal::Present("acme"), "/api/v1/records/drivers").await,
            Err(ResolveError::StoreUnavailable)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_timeout_is_unavailable() {
        let store = FakeStore::new(FakeMode::Hanging);
        let resolver = resolver(store);

        assert_eq!(
            resolver.resolve(Signal::Present("acme"), "/api/v1/records/drivers").await,
            Err(ResolveError::StoreUnavailable)
        );
    }

    #[test]
    fn test_tenants_report_path_is_not_exempt() {
        let resolver = resolver(FakeStore::new(FakeMode::Normal));
        assert!(!resolver.exempt_paths().is_exempt("/api/v1/tenants-report"));
    }
}
