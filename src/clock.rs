//! Time source for package file names.

use chrono::{DateTime, TimeZone, Utc};

/// Supplies the current time. Injected so exports can be reproduced.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// 1970-01-01T00:00:00Z.
    pub fn epoch() -> Self {
        FixedClock(DateTime::UNIX_EPOCH)
    }

    /// Clock fixed at `secs` seconds after the epoch; out-of-range values
    /// fall back to the epoch.
    pub fn at_timestamp(secs: i64) -> Self {
        FixedClock(Utc.timestamp_opt(secs, 0).single().unwrap_or(DateTime::UNIX_EPOCH))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
