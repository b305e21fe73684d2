//! Alert persistence
//!
//! Each alert is written under its own key and its id pushed onto a capped
//! index list. Ordering and the cap rely on the backend's list commands;
//! there is no locking or retry here.

use std::sync::Arc;

use alert_kv::{Backend, KvStore};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{alert_id, AlertRecord};
use crate::error::{AlertError, Result};
use crate::time::TimeProvider;

const PROBE_KEY: &str = "test-key";
const PROBE_VALUE: &str = "test-value";

/// Result of a single ingestion
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub id: String,
    pub record: AlertRecord,
    /// False when no backend is configured
    pub persisted: bool,
}

/// Backend round-trip report
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub backend: &'static str,
    pub set: String,
    pub get: Option<String>,
    pub keys: Vec<String>,
}

pub struct AlertStore {
    backend: Backend,
    index_key: String,
    max_alerts: usize,
    clock: Arc<dyn TimeProvider>,
}

impl AlertStore {
    pub fn new(
        backend: Backend,
        index_key: impl Into<String>,
        max_alerts: usize,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            backend,
            index_key: index_key.into(),
            max_alerts: max_alerts.max(1),
            clock,
        }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn index_key(&self) -> &str {
        &self.index_key
    }

    pub fn max_alerts(&self) -> usize {
        self.max_alerts
    }

    /// Persist a record and index it newest-first
    ///
    /// Alerts arriving within the same millisecond share an id: the later
    /// write replaces the record and the id is indexed twice.
    pub async fn ingest(&self, record: AlertRecord) -> Result<IngestOutcome> {
        let id = alert_id(self.clock.now_millis());

        let Some(kv) = self.backend.store() else {
            warn!("Backend not configured, alert {} not persisted", id);
            return Ok(IngestOutcome {
                id,
                record,
                persisted: false,
            });
        };

        let body = serde_json::to_string(&record)?;
        kv.set(&id, &body).await?;
        let len = kv.lpush(&self.index_key, &id).await?;
        kv.ltrim(&self.index_key, 0, self.max_alerts as isize - 1).await?;

        if len as usize > self.max_alerts {
            debug!(
                "Index {} trimmed to {} entries",
                self.index_key, self.max_alerts
            );
        }
        info!("Stored alert {}", id);

        Ok(IngestOutcome {
            id,
            record,
            persisted: true,
        })
    }

    /// Ids in the index, newest first; empty when unconfigured
    pub async fn index(&self) -> Result<Vec<String>> {
        match self.backend.store() {
            Some(kv) => Ok(kv.lrange(&self.index_key, 0, -1).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Write, read back and list keys to verify the backend works
    pub async fn probe(&self) -> Result<ProbeReport> {
        let kv: &Arc<dyn KvStore> = self
            .backend
            .store()
            .ok_or(AlertError::BackendUnavailable)?;

        kv.set(PROBE_KEY, PROBE_VALUE).await?;
        let get = kv.get(PROBE_KEY).await?;
        let keys = kv.keys("*").await?;
        info!("Backend probe ok ({} keys)", keys.len());

        Ok(ProbeReport {
            backend: kv.name(),
            set: "OK".to_string(),
            get,
            keys,
        })
    }
}
