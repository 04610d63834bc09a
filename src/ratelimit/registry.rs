//! Named limiters over one shared store.

use std::collections::HashMap;

use super::limiter::RateLimiter;

/// A set of limiters looked up by policy name.
///
/// Route handlers fetch the limiter for their endpoint's policy by name
/// rather than holding each limiter individually.
#[derive(Default)]
pub struct LimiterRegistry {
    limiters: HashMap<String, RateLimiter>,
}

impl LimiterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a limiter under a policy name, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, limiter: RateLimiter) {
        self.limiters.insert(name.into(), limiter);
    }

    /// Look up a limiter by policy name.
    pub fn get(&self, name: &str) -> Option<&RateLimiter> {
        self.limiters.get(name)
    }

    /// Number of registered limiters.
    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    /// Whether the registry holds no limiters.
    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }
}
