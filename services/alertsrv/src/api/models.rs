//! API request and response models

use serde::Serialize;

use crate::domain::AlertRecord;
use crate::services::ProbeReport;

/// Response to a successful ingestion
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub success: bool,
    pub alert_id: String,
    /// False when running without a backend
    pub persisted: bool,
    pub data: AlertRecord,
}

#[derive(Debug, Serialize)]
pub struct AlertListResponse {
    pub alerts: Vec<AlertRecord>,
    pub meta: AlertListMeta,
}

#[derive(Debug, Serialize)]
pub struct AlertListMeta {
    pub total: usize,
    pub valid: usize,
}

#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(flatten)]
    pub report: ProbeReport,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub backend: &'static str,
    pub timestamp: String,
}
