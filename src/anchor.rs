//! Timestamp bookkeeping and timing records
//!
//! The anchor remembers the first and the most recent timestamp of a run.
//! It is owned by the classifier and threaded through the dispatch path, so
//! there is exactly one writer.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const JOURNAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// One recognized milestone with its deltas, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingRecord {
    pub name: String,
    pub reason: String,
    pub since_start: f64,
    /// Signed: journal input is not guaranteed to be monotonic
    pub since_last: f64,
}

/// First and last observed timestamps of a run
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampAnchor {
    start: Option<f64>,
    last: f64,
}

impl TimestampAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `timestamp` and return `(since_start, since_last)`
    pub fn observe(&mut self, timestamp: f64) -> (f64, f64) {
        let start = match self.start {
            Some(start) => start,
            None => {
                self.start = Some(timestamp);
                self.last = timestamp;
                timestamp
            }
        };
        let deltas = (timestamp - start, timestamp - self.last);
        self.last = timestamp;
        deltas
    }

    /// Build a record for a milestone observed at `timestamp`
    pub fn record(&mut self, name: String, reason: String, timestamp: f64) -> TimingRecord {
        let (since_start, since_last) = self.observe(timestamp);
        TimingRecord {
            name,
            reason,
            since_start,
            since_last,
        }
    }

    pub fn is_anchored(&self) -> bool {
        self.start.is_some()
    }
}

/// Where a line's timestamp comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimestampSource {
    /// Wall-clock capture at read time; overrides any journal timestamp
    Captured(f64),
    /// Journal timestamp when present and valid, else the read time
    PreferJournal(f64),
}

/// Current wall-clock time as fractional epoch seconds
pub fn wall_clock() -> f64 {
    epoch_seconds(Utc::now())
}

/// Parse a journal timestamp (local time, no offset) into epoch seconds
///
/// Returns `None` for malformed input and for local times that do not
/// exist (DST gaps). Ambiguous local times resolve to the earlier instant.
pub fn parse_journal_timestamp(text: &str) -> Option<f64> {
    let naive = NaiveDateTime::parse_from_str(text, JOURNAL_FORMAT).ok()?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    Some(epoch_seconds(local))
}

fn epoch_seconds<Tz: TimeZone>(instant: DateTime<Tz>) -> f64 {
    instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) / 1e9
}
