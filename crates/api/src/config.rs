//! Application configuration

use axum::http::HeaderName;
use std::env;
use std::time::Duration;

/// Default header carrying the tenant subdomain signal
pub const DEFAULT_TENANT_HEADER: &str = "x-tenant-subdomain";

/// Route prefixes that operate before/outside any tenant context
pub const DEFAULT_EXEMPT_PREFIXES: &[&str] = &["/api/v1/tenants", "/health"];

/// Which store implementation backs tenants and records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local store, contents are lost on restart
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::Invalid("STORAGE_BACKEND must be 'postgres' or 'memory'")),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,

    // Storage
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    // Tenancy
    pub tenant_header: HeaderName,
    pub tenant_exempt_prefixes: Vec<String>,
    pub tenant_lookup_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage_backend: StorageBackend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;

        let database_url = env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let tenant_header = env::var("TENANT_HEADER")
            .unwrap_or_else(|_| DEFAULT_TENANT_HEADER.to_string());
        let tenant_header = HeaderName::from_bytes(tenant_header.trim().to_lowercase().as_bytes())
            .map_err(|_| ConfigError::Invalid("TENANT_HEADER is not a valid header name"))?;

        let tenant_exempt_prefixes = match env::var("TENANT_EXEMPT_PREFIXES") {
            Ok(raw) => parse_prefix_list(&raw),
            Err(_) => DEFAULT_EXEMPT_PREFIXES.iter().map(|p| p.to_string()).collect(),
        };

        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),

            // Storage
            storage_backend,
            database_url,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            // Tenancy
            tenant_header,
            tenant_exempt_prefixes,
            tenant_lookup_timeout: Duration::from_millis(
                env::var("TENANT_LOOKUP_TIMEOUT_MS")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .unwrap_or(5000),
            ),
        })
    }
}

/// Split a comma-separated prefix list, dropping empty entries
fn parse_prefix_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}
