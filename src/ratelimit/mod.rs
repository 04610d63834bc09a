//! Rate limiting logic and state management.

mod clock;
mod decision;
mod limiter;
mod policy;
mod registry;
mod store;

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub(crate) use clock::ManualClock;
pub use decision::Decision;
pub use limiter::RateLimiter;
pub use policy::Policy;
pub use registry::LimiterRegistry;
pub use store::{CounterEntry, CounterStore, MemoryStore};
