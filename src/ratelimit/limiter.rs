//! Core fixed-window rate limiter implementation.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::clock::{Clock, SystemClock};
use super::decision::Decision;
use super::policy::Policy;
use super::store::{CounterEntry, CounterStore, MemoryStore};

/// A fixed-window rate limiter binding one [`Policy`] to a shared counter store.
///
/// Multiple limiters (one per policy) may share the same store; the policy's
/// key namespace keeps their buckets apart. The limiter is thread-safe and
/// can be shared across request-handling tasks.
///
/// Fixed-window semantics: the count resets at fixed boundaries rather than
/// continuously, so up to `2 x max_requests` requests can land either side of
/// a boundary. This imprecision is accepted in exchange for a single counter
/// per key; no smoothing or token refill is performed.
pub struct RateLimiter {
    policy: Policy,
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
    /// Serializes the lookup-then-write sequence so two callers sharing a key
    /// cannot both observe `count = max_requests - 1` and each be admitted.
    update: Mutex<()>,
}

impl RateLimiter {
    /// Create a limiter with its own in-memory store.
    pub fn new(policy: Policy) -> Self {
        Self::with_store(policy, Arc::new(MemoryStore::new()))
    }

    /// Create a limiter over a shared store.
    pub fn with_store(policy: Policy, store: Arc<dyn CounterStore>) -> Self {
        Self::with_clock(policy, store, Arc::new(SystemClock))
    }

    /// Create a limiter with an explicit clock.
    pub fn with_clock(policy: Policy, store: Arc<dyn CounterStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            store,
            clock,
            update: Mutex::new(()),
        }
    }

    /// The policy this limiter enforces.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Check one request against the policy and record it if admitted.
    ///
    /// The identifier is any caller-chosen string (client IP, API key, ...);
    /// the limiter does not interpret it. An empty string is not rejected, it
    /// simply forms its own bucket. This never fails: denial is reported as a
    /// normal [`Decision`], not an error.
    pub fn check_limit(&self, identifier: &str) -> Decision {
        let key = self.policy.key_for(identifier);
        let now = self.clock.now_ms();

        // Opportunistic housekeeping; expiry is re-checked on the lookup
        // path below, so sweep timing is never correctness-critical.
        let evicted = self.store.sweep(now);
        if evicted > 0 {
            trace!(evicted, "Swept expired counters");
        }

        let _guard = self.update.lock();

        match self.store.get(&key) {
            Some(entry) if !entry.is_expired(now) => {
                if entry.count >= self.policy.max_requests() {
                    let retry_after = ((entry.reset_at - now) as u64).div_ceil(1000);
                    debug!(key = %key, retry_after, "Rate limit exceeded");
                    Decision {
                        allowed: false,
                        remaining: 0,
                        reset_time: entry.reset_at,
                        retry_after: Some(retry_after),
                    }
                } else {
                    let updated = CounterEntry {
                        count: entry.count + 1,
                        reset_at: entry.reset_at,
                    };
                    self.store.set(&key, updated);
                    Decision {
                        allowed: true,
                        remaining: self.policy.max_requests().saturating_sub(updated.count),
                        reset_time: updated.reset_at,
                        retry_after: None,
                    }
                }
            }
            // Absent, or left over from a previous window: open a new one.
            _ => {
                let entry = CounterEntry {
                    count: 1,
                    reset_at: now.saturating_add(self.policy.window_ms()),
                };
                trace!(key = %key, reset_at = entry.reset_at, "Opening new window");
                self.store.set(&key, entry);
                Decision {
                    allowed: true,
                    remaining: self.policy.max_requests().saturating_sub(1),
                    reset_time: entry.reset_at,
                    retry_after: None,
                }
            }
        }
    }

    /// Current count for an identifier, if a window is open.
    ///
    /// Primarily useful for tests and introspection.
    pub fn current_count(&self, identifier: &str) -> Option<u32> {
        let key = self.policy.key_for(identifier);
        let now = self.clock.now_ms();
        self.store
            .get(&key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.count)
    }
}
