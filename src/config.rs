//! Policy configuration loading.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::error::{FloodgateError, Result};
use crate::ratelimit::{CounterStore, LimiterRegistry, MemoryStore, Policy, RateLimiter};

/// A set of named rate limit policies.
///
/// The default set carries the built-in policies; deployments override or
/// extend it from a YAML file:
///
/// ```yaml
/// policies:
///   api:
///     window_secs: 3600
///     max_requests: 1000
///   download_burst:
///     window_secs: 900
///     max_requests: 3
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySet {
    /// Map of policy name to its definition
    #[serde(default)]
    pub policies: HashMap<String, PolicyConfig>,
}

/// Definition of a single policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Window length in seconds
    pub window_secs: u64,
    /// Maximum requests allowed in one window
    pub max_requests: u32,
    /// Key namespace; defaults to the policy name
    #[serde(default)]
    pub prefix: Option<String>,
}

impl Default for PolicySet {
    fn default() -> Self {
        let mut policies = HashMap::new();
        for (name, policy) in [
            ("api", Policy::general_api()),
            ("query", Policy::query_api()),
            ("download", Policy::download()),
            ("download_burst", Policy::download_burst()),
        ] {
            policies.insert(
                name.to_string(),
                PolicyConfig {
                    window_secs: policy.window().as_secs(),
                    max_requests: policy.max_requests(),
                    prefix: Some(policy.prefix().to_string()),
                },
            );
        }
        Self { policies }
    }
}

impl PolicySet {
    /// Load a policy set from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading rate limit policies");

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load a policy set from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let set: PolicySet = serde_yaml::from_str(yaml)
            .map_err(|e| FloodgateError::Config(format!("Failed to parse policies: {}", e)))?;
        set.validate()?;
        Ok(set)
    }

    fn validate(&self) -> Result<()> {
        let mut prefixes: HashMap<&str, &str> = HashMap::new();
        for (name, policy) in &self.policies {
            if policy.window_secs == 0 {
                return Err(FloodgateError::Config(format!(
                    "Policy '{}' has a zero-length window",
                    name
                )));
            }
            if policy.max_requests == 0 {
                return Err(FloodgateError::Config(format!(
                    "Policy '{}' allows zero requests",
                    name
                )));
            }
            // Prefixes are what keep policies out of each other's buckets in
            // a shared store; a collision silently merges their counters.
            let prefix = policy.prefix.as_deref().unwrap_or(name);
            if let Some(other) = prefixes.insert(prefix, name) {
                return Err(FloodgateError::Config(format!(
                    "Policies '{}' and '{}' share the key prefix '{}'",
                    other, name, prefix
                )));
            }
        }
        Ok(())
    }

    /// Build one limiter per policy over a fresh in-memory store.
    pub fn build_registry(&self) -> LimiterRegistry {
        self.build_registry_with_store(Arc::new(MemoryStore::new()))
    }

    /// Build one limiter per policy over a caller-provided shared store.
    pub fn build_registry_with_store(&self, store: Arc<dyn CounterStore>) -> LimiterRegistry {
        let mut registry = LimiterRegistry::new();
        for (name, config) in &self.policies {
            let prefix = config.prefix.clone().unwrap_or_else(|| name.clone());
            let policy = Policy::new(
                prefix,
                Duration::from_secs(config.window_secs),
                config.max_requests,
            );
            registry.insert(name.clone(), RateLimiter::with_store(policy, Arc::clone(&store)));
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_carries_builtin_policies() {
        let set = PolicySet::default();

        assert_eq!(set.policies.len(), 4);
        assert_eq!(set.policies["api"].max_requests, 1000);
        assert_eq!(set.policies["query"].max_requests, 500);
        assert_eq!(set.policies["download"].window_secs, 3600);
        assert_eq!(set.policies["download_burst"].window_secs, 900);
    }

    #[test]
    fn test_parse_policies_from_yaml() {
        let yaml = r#"
policies:
  search:
    window_secs: 60
    max_requests: 20
  upload:
    window_secs: 3600
    max_requests: 5
    prefix: up
"#;
        let set = PolicySet::from_yaml(yaml).unwrap();

        assert_eq!(set.policies.len(), 2);
        assert_eq!(set.policies["search"].max_requests, 20);
        assert_eq!(set.policies["upload"].prefix.as_deref(), Some("up"));
    }

    #[test]
    fn test_invalid_yaml_is_a_config_error() {
        let result = PolicySet::from_yaml("policies: [not, a, map]");
        assert!(matches!(result, Err(FloodgateError::Config(_))));
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let yaml = r#"
policies:
  broken:
    window_secs: 0
    max_requests: 10
"#;
        assert!(matches!(
            PolicySet::from_yaml(yaml),
            Err(FloodgateError::Config(_))
        ));
    }

    #[test]
    fn test_zero_max_requests_is_rejected() {
        let yaml = r#"
policies:
  broken:
    window_secs: 60
    max_requests: 0
"#;
        assert!(matches!(
            PolicySet::from_yaml(yaml),
            Err(FloodgateError::Config(_))
        ));
    }

    #[test]
    fn test_duplicate_prefixes_are_rejected() {
        let yaml = r#"
policies:
  search:
    window_secs: 60
    max_requests: 20
    prefix: s
  suggest:
    window_secs: 60
    max_requests: 10
    prefix: s
"#;
        assert!(matches!(
            PolicySet::from_yaml(yaml),
            Err(FloodgateError::Config(_))
        ));
    }

    #[test]
    fn test_explicit_prefix_colliding_with_a_policy_name_is_rejected() {
        let yaml = r#"
policies:
  search:
    window_secs: 60
    max_requests: 20
  suggest:
    window_secs: 60
    max_requests: 10
    prefix: search
"#;
        assert!(matches!(
            PolicySet::from_yaml(yaml),
            Err(FloodgateError::Config(_))
        ));
    }

    #[test]
    fn test_registry_limiters_share_the_store() {
        let store: Arc<dyn CounterStore> = Arc::new(MemoryStore::new());
        let registry = PolicySet::default().build_registry_with_store(Arc::clone(&store));

        assert_eq!(registry.len(), 4);

        registry.get("api").unwrap().check_limit("1.2.3.4");
        registry.get("query").unwrap().check_limit("1.2.3.4");

        // Same identifier, two policies: two namespaced entries in one store.
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_prefix_defaults_to_policy_name() {
        let yaml = r#"
policies:
  search:
    window_secs: 60
    max_requests: 20
"#;
        let registry = PolicySet::from_yaml(yaml).unwrap().build_registry();
        assert_eq!(registry.get("search").unwrap().policy().prefix(), "search");
    }
}
