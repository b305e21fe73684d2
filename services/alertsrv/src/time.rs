//! Clock abstraction for alert ids and receipt timestamps
//!
//! Ingestion reads the clock twice (receipt timestamp and id), so tests
//! inject a fixed or stepping clock instead of sleeping between requests.

use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of "now" for the ingestion pipeline
pub trait TimeProvider: Send + Sync + 'static {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;

    /// Current instant as a UTC datetime
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_millis()).unwrap_or_else(Utc::now)
    }
}

/// Wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Always returns the same instant
#[derive(Clone, Copy, Debug)]
pub struct FixedTimeProvider {
    timestamp_ms: i64,
}

impl FixedTimeProvider {
    pub fn new(timestamp_ms: i64) -> Self {
        Self { timestamp_ms }
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now_millis(&self) -> i64 {
        self.timestamp_ms
    }
}

/// Advances by a fixed step on every read
///
/// Gives each ingestion in a test a distinct, strictly increasing id.
#[derive(Debug)]
pub struct SteppingTimeProvider {
    next_ms: AtomicI64,
    step_ms: i64,
}

impl SteppingTimeProvider {
    pub fn new(start_ms: i64, step_ms: i64) -> Self {
        Self {
            next_ms: AtomicI64::new(start_ms),
            step_ms,
        }
    }
}

impl TimeProvider for SteppingTimeProvider {
    fn now_millis(&self) -> i64 {
        self.next_ms.fetch_add(self.step_ms, Ordering::SeqCst)
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.123Z`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
