//! Ingestion and retrieval pipeline
//!
//! parser -> enricher -> store on the way in, store -> reader on the way out.

pub mod enricher;
pub mod parser;
pub mod reader;
pub mod store;

pub use enricher::AlertEnricher;
pub use parser::{AlertParser, FieldKind, FieldRule, FieldTarget, FIELD_RULES};
pub use reader::{AlertReader, RecentAlerts};
pub use store::{AlertStore, IngestOutcome, ProbeReport};
