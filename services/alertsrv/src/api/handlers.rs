//! API handlers for the alert service

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::api::models::*;
use crate::domain::Payload;
use crate::error::ApiError;
use crate::time::format_timestamp;
use crate::AppState;

/// Liveness plus which backend is in use
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "alertsrv",
        version: env!("CARGO_PKG_VERSION"),
        backend: state.backend().describe(),
        timestamp: format_timestamp(chrono::Utc::now()),
    })
}

/// Ingest one webhook alert
///
/// `application/json` bodies are parsed as JSON; anything else goes through
/// text extraction. Storage failures are reported as 400.
pub async fn create_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<IngestResponse>, ApiError> {
    let body = String::from_utf8(body.to_vec())
        .map_err(|_| ApiError::bad_request("Request body is not valid UTF-8"))?;
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    debug!(
        "Received alert ({} bytes, content type {:?})",
        body.len(),
        content_type
    );

    let parsed = state.parser.parse(Payload::from_body(content_type, &body));
    let record = state.enricher.enrich(parsed, &body);

    match state.store.ingest(record).await {
        Ok(outcome) => Ok(Json(IngestResponse {
            success: true,
            alert_id: outcome.id,
            persisted: outcome.persisted,
            data: outcome.record,
        })),
        Err(e) => {
            error!("Error processing alert: {}", e);
            Err(ApiError::bad_request(e.to_string()))
        },
    }
}

/// Most recent alerts, newest first
pub async fn list_alerts(
    State(state): State<AppState>,
) -> Result<Json<AlertListResponse>, ApiError> {
    match state.reader.list_recent().await {
        Ok(recent) => Ok(Json(AlertListResponse {
            meta: AlertListMeta {
                total: recent.total,
                valid: recent.valid,
            },
            alerts: recent.alerts,
        })),
        Err(e) => {
            error!("Error fetching alerts: {}", e);
            Err(ApiError::internal(e.to_string()))
        },
    }
}

/// Backend round trip: SET, GET and KEYS
pub async fn backend_probe(
    State(state): State<AppState>,
) -> Result<Json<ProbeResponse>, (StatusCode, Json<Value>)> {
    match state.store.probe().await {
        Ok(report) => Ok(Json(ProbeResponse {
            success: true,
            message: "Backend connection successful",
            report,
        })),
        Err(e) => {
            error!("Backend probe failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            ))
        },
    }
}
