//! Ingestion metadata
//!
//! Every stored alert carries when it arrived, which channel it came from
//! and the body exactly as received. Sender fields may override `source`;
//! `receivedAt` and `rawPayload` are always the server's values.

use std::sync::Arc;

use crate::domain::{fields, AlertRecord};
use crate::time::{format_timestamp, TimeProvider};

pub struct AlertEnricher {
    source: String,
    clock: Arc<dyn TimeProvider>,
}

impl AlertEnricher {
    pub fn new(source: impl Into<String>, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            source: source.into(),
            clock,
        }
    }

    pub fn enrich(&self, parsed: AlertRecord, raw_body: &str) -> AlertRecord {
        let mut record = AlertRecord::new();
        record.insert(fields::SOURCE, self.source.as_str());
        record.merge(parsed);
        record.insert(fields::RECEIVED_AT, format_timestamp(self.clock.now()));
        record.insert(fields::RAW_PAYLOAD, raw_body);
        record
    }
}
