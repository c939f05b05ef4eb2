//! Analysis timestamps.
//!
//! Timestamps double as cache keys for derived metrics, so a [`MonotonicClock`]
//! guarantees that two analyses from the same engine never share one.

use chrono::{DateTime, Duration, Utc};
use core::fmt;
use serde::{Deserialize, Serialize};

/// UTC instant at which an analysis result was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap a chrono instant.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Underlying chrono instant.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Nanoseconds since the Unix epoch, `None` outside the ~584 year range.
    pub fn as_nanos(&self) -> Option<i64> {
        self.0.timestamp_nanos_opt()
    }

    /// The instant one nanosecond later.
    pub fn next_tick(&self) -> Self {
        Self(self.0 + Duration::nanoseconds(1))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true))
    }
}

/// Issues strictly increasing timestamps.
///
/// Wall-clock readings that do not advance past the previous stamp (coarse
/// clocks, back-to-back calls, NTP steps) are bumped by one nanosecond.
#[derive(Debug, Clone, Default)]
pub struct MonotonicClock {
    last: Option<Timestamp>,
}

impl MonotonicClock {
    /// Create a clock with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next timestamp, strictly after every one issued before.
    pub fn tick(&mut self) -> Timestamp {
        self.tick_at(Timestamp::now())
    }

    /// Like [`tick`](Self::tick) with an explicit wall-clock reading.
    pub fn tick_at(&mut self, now: Timestamp) -> Timestamp {
        let stamp = match self.last {
            Some(last) if now <= last => last.next_tick(),
            _ => now,
        };
        self.last = Some(stamp);
        stamp
    }

    /// Most recently issued timestamp.
    pub fn last(&self) -> Option<Timestamp> {
        self.last
    }
}
