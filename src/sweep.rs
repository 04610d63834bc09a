//! Background eviction of expired counters.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::ratelimit::{Clock, CounterStore, SystemClock};

/// Periodically drop expired entries from a shared store.
///
/// The in-check sweep already keeps the table bounded under steady traffic;
/// this task covers stores whose limiters have gone quiet. Runs until the
/// spawned task is aborted or the future is dropped.
pub async fn run(store: Arc<dyn CounterStore>, interval: Duration) {
    run_with_clock(store, interval, Arc::new(SystemClock)).await
}

/// Like [`run`], with an explicit clock.
pub async fn run_with_clock(
    store: Arc<dyn CounterStore>,
    interval: Duration,
    clock: Arc<dyn Clock>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick of a fresh interval completes immediately; skip it so
    // the first sweep happens one full interval in.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let evicted = store.sweep(clock.now_ms());
        if evicted > 0 {
            debug!(evicted, remaining = store.len(), "Swept expired rate limit counters");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratelimit::{CounterEntry, ManualClock, MemoryStore};

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_expired_entries() {
        let store: Arc<dyn CounterStore> = Arc::new(MemoryStore::new());
        store.set(
            "api:stale",
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

        let clock = Arc::new(ManualClock::new(100));
        let task = tokio::spawn(run_with_clock(
            Arc::clone(&store),
            Duration::from_secs(1),
            clock as Arc<dyn Clock>,
        ));

        // Let the sweeper pass its skipped first tick and run one sweep.
        tokio::time::sleep(Duration::from_millis(2_100)).await;

        assert_eq!(store.len(), 1);
        assert!(store.get("api:live").is_some());

        task.abort();
    }
}
