//! Domain module for the alert service
//!
//! Canonical alert records and the inbound payload shapes they are built from.

pub mod payload;
pub mod record;

pub use payload::Payload;
pub use record::{alert_id, fields, AlertRecord, ALERT_ID_PREFIX};
