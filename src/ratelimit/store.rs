//! Counter storage behind the limiter.

use dashmap::DashMap;

/// A single fixed-window counter record.
///
/// Created lazily on the first request for a key and replaced wholesale once
/// its window has ended; there is never more than one live entry per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterEntry {
    /// Requests observed in the current window
    pub count: u32,
    /// Absolute time at which the window ends, milliseconds since the Unix epoch
    pub reset_at: i64,
}

impl CounterEntry {
    /// Whether this entry's window has ended.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.reset_at
    }
}

/// Storage for counter entries, keyed by the policy-derived string.
///
/// Abstracted as a trait so the in-process map can be swapped for an external
/// shared cache in multi-instance deployments. Implementations must be safe
/// to share across request-handling tasks.
pub trait CounterStore: Send + Sync {
    /// Look up the entry for a key.
    fn get(&self, key: &str) -> Option<CounterEntry>;

    /// Insert or replace the entry for a key.
    fn set(&self, key: &str, entry: CounterEntry);

    /// Delete the entry for a key, if present.
    fn remove(&self, key: &str);

    /// Drop every entry whose window has ended. Returns the number evicted.
    ///
    /// Housekeeping only: the lookup path detects and replaces expired
    /// entries on its own, so correctness never depends on sweep timing.
    fn sweep(&self, now_ms: i64) -> usize;

    /// Number of stored entries, live or expired.
    fn len(&self) -> usize;

    /// Whether the store holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store backed by a concurrent hash map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, CounterEntry>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for MemoryStore {
    fn get(&self, key: &str) -> Option<CounterEntry> {
        self.entries.get(key).map(|entry| *entry)
    }

    fn set(&self, key: &str, entry: CounterEntry) {
        self.entries.insert(key.to_string(), entry);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    fn sweep(&self, now_ms: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now_ms));
        before.saturating_sub(self.entries.len())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        let entry = CounterEntry {
            count: 1,
            reset_at: 1_000,
        };

        assert!(store.get("api:1.2.3.4").is_none());

        store.set("api:1.2.3.4", entry);
        assert_eq!(store.get("api:1.2.3.4"), Some(entry));
        assert_eq!(store.len(), 1);

        store.remove("api:1.2.3.4");
        assert!(store.get("api:1.2.3.4").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_replaces_existing_entry() {
        let store = MemoryStore::new();
        store.set(
            "api:k",
            CounterEntry {
                count: 1,
                reset_at: 1_000,
            },
        );
        store.set(
            "api:k",
            CounterEntry {
                count: 2,
                reset_at: 1_000,
            },
        );

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("api:k").unwrap().count, 2);
    }

    #[test]
    fn test_sweep_evicts_only_expired() {
        let store = MemoryStore::new();
        store.set(
            "api:old",
            CounterEntry {
                count: 5,
                reset_at: 100,
            },
        );
        store.set(
            "api:older",
            CounterEntry {
                count: 3,
                reset_at: 50,
            },
        );
        store.set(
            "api:live",
            CounterEntry {
                count: 1,
                reset_at: 10_000,
            },
        );

        let evicted = store.sweep(200);

        assert_eq!(evicted, 2);
        assert_eq!(store.len(), 1);
        assert!(store.get("api:live").is_some());
    }

    #[test]
    fn test_entry_expiry_is_strict() {
        let entry = CounterEntry {
            count: 1,
            reset_at: 500,
        };

        // Expiry only once the reset time has passed, not at it.
        assert!(!entry.is_expired(499));
        assert!(!entry.is_expired(500));
        assert!(entry.is_expired(501));
    }
}
