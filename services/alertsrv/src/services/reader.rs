//! Recent alert retrieval
//!
//! Resolves the index into records with one concurrent GET per id. Entries
//! that fail to load are skipped so one bad key never hides the rest.

use std::sync::Arc;

use alert_kv::KvStore;
use futures::future::join_all;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use super::store::AlertStore;
use crate::domain::AlertRecord;
use crate::error::Result;

/// Hydrated alerts, newest first
#[derive(Debug, Clone, Default)]
pub struct RecentAlerts {
    pub alerts: Vec<AlertRecord>,
    /// Ids found in the index
    pub total: usize,
    /// Ids that resolved to a record
    pub valid: usize,
}

pub struct AlertReader {
    store: Arc<AlertStore>,
}

impl AlertReader {
    pub fn new(store: Arc<AlertStore>) -> Self {
        Self { store }
    }

    pub async fn list_recent(&self) -> Result<RecentAlerts> {
        let Some(kv) = self.store.backend().store() else {
            debug!("Backend not configured, no alerts to list");
            return Ok(RecentAlerts::default());
        };

        let ids = self.store.index().await?;
        if ids.is_empty() {
            return Ok(RecentAlerts::default());
        }

        let fetched = join_all(ids.iter().map(|id| load(kv.as_ref(), id))).await;
        let mut alerts: Vec<AlertRecord> = fetched.into_iter().flatten().collect();
        sort_newest_first(&mut alerts);

        debug!(
            "Loaded {}/{} alerts from {}",
            alerts.len(),
            ids.len(),
            self.store.index_key()
        );
        Ok(RecentAlerts {
            total: ids.len(),
            valid: alerts.len(),
            alerts,
        })
    }
}

async fn load(kv: &dyn KvStore, id: &str) -> Option<AlertRecord> {
    let raw = match kv.get(id).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("Alert {} is indexed but missing", id);
            return None;
        },
        Err(e) => {
            error!("Error fetching alert {}: {}", id, e);
            return None;
        },
    };

    match serde_json::from_str::<Map<String, Value>>(&raw) {
        Ok(map) => Some(AlertRecord::from(map).with_id(id)),
        Err(e) => {
            warn!("Skipping unreadable alert {}: {}", id, e);
            None
        },
    }
}

/// Descending by `receivedAt`; undated records keep index order at the end
fn sort_newest_first(alerts: &mut [AlertRecord]) {
    alerts.sort_by(|a, b| b.received_at().cmp(&a.received_at()));
}
