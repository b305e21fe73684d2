//! Canonical alert record
//!
//! Alerts are open-ended: whatever fields the sender put in the payload are
//! kept. The record is therefore a JSON object with typed accessors for the
//! handful of fields the service itself reads or writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix of every alert key in the backend
pub const ALERT_ID_PREFIX: &str = "alert:";

/// Field names written by the service
pub mod fields {
    pub const ID: &str = "id";
    pub const RECEIVED_AT: &str = "receivedAt";
    pub const SOURCE: &str = "source";
    pub const RAW_PAYLOAD: &str = "rawPayload";
    pub const BAR: &str = "bar";
}

/// Backend key for an alert received at `millis`
pub fn alert_id(millis: i64) -> String {
    format!("{}{}", ALERT_ID_PREFIX, millis)
}

/// A single alert as stored and returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertRecord(Map<String, Value>);

impl AlertRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Insert or replace a field
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Merge `other` over this record; fields of `other` win on collision
    pub fn merge(&mut self, other: AlertRecord) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    /// Attach the backend id
    pub fn with_id(mut self, id: &str) -> Self {
        self.insert(fields::ID, id);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.get_str(fields::ID)
    }

    pub fn source(&self) -> Option<&str> {
        self.get_str(fields::SOURCE)
    }

    pub fn raw_payload(&self) -> Option<&str> {
        self.get_str(fields::RAW_PAYLOAD)
    }

    /// Receipt time, if present and a valid RFC 3339 timestamp
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        self.get_str(fields::RECEIVED_AT)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for AlertRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<AlertRecord> for Value {
    fn from(record: AlertRecord) -> Self {
        Value::Object(record.0)
    }
}
