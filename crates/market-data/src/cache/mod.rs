//! Process-wide TTL cache and the clock it reads time from.

mod clock;
mod ttl_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ttl_cache::TtlCache;
