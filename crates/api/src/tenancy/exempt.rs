//! Route prefixes exempt from tenant resolution
//!
//! Matching is done on whole path segments: the prefix `/api/v1/tenants`
//! covers `/api/v1/tenants` and `/api/v1/tenants/42`, but not
//! `/api/v1/tenants-report`.

/// Allow-list of exempt route prefixes
#[derive(Debug, Clone, Default)]
pub struct ExemptPaths {
    prefixes: Vec<String>,
}

impl ExemptPaths {
    /// Build the allow-list, normalizing each prefix to `/a/b` form
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = prefixes
            .into_iter()
            .filter_map(|p| normalize_prefix(p.as_ref()))
            .collect();
        Self { prefixes }
    }

    /// Whether `path` falls under one of the exempt prefixes
    pub fn is_exempt(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| {
            if prefix == "/" {
                return true;
            }
            match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            }
        })
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        // bare "/" exempts everything and is kept only when given explicitly
        return (raw.trim() == "/").then(|| "/".to_string());
    }
    if trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("/{}", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EXEMPT_PREFIXES;

    fn defaults() -> ExemptPaths {
        ExemptPaths::new(DEFAULT_EXEMPT_PREFIXES)
    }

    #[test]
    fn test_exact_and_nested_paths_are_exempt() {
        let exempt = defaults();
        assert!(exempt.is_exempt("/api/v1/tenants"));
        assert!(exempt.is_exempt("/api/v1/tenants/"));
        assert!(exempt.is_exempt("/api/v1/tenants/0b0e6f9c-1f55-4c43-8f8e-6f1f0b9e2a11"));
        assert!(exempt.is_exempt("/health"));
        assert!(exempt.is_exempt("/health/live"));
        assert!(exempt.is_exempt("/health/ready"));
    }

    #[test]
    fn test_substring_lookalikes_are_not_exempt() {
        let exempt = defaults();
        assert!(!exempt.is_exempt("/api/v1/tenants-report"));
        assert!(!exempt.is_exempt("/api/v1/records/tenants"));
        assert!(!exempt.is_exempt("/healthcheck"));
        assert!(!exempt.is_exempt("/api/v1/records/drivers/health"));
        assert!(!exempt.is_exempt("/"));
    }

    #[test]
    fn test_prefix_normalization() {
        let exempt = ExemptPaths::new(["status/", " /metrics ", ""]);
        assert_eq!(exempt.prefixes(), &["/status".to_string(), "/metrics".to_string()]);
        assert!(exempt.is_exempt("/status"));
        assert!(exempt.is_exempt("/metrics/prometheus"));
    }

    #[test]
    fn test_root_prefix_exempts_everything() {
        let exempt = ExemptPaths::new(["/"]);
        assert!(exempt.is_exempt("/"));
        assert!(exempt.is_exempt("/api/v1/records/drivers"));
    }

    #[test]
    fn test_empty_list_exempts_nothing() {
        let exempt = ExemptPaths::default();
        assert!(!exempt.is_exempt("/health"));
    }
}
