//! Application state shared across all API handlers

use std::sync::Arc;

use alert_kv::{Backend, BackendKind};
use tracing::{info, warn};

use crate::config::{AlertConfig, BACKEND_URL_ENV};
use crate::error::{AlertError, Result};
use crate::services::{AlertEnricher, AlertParser, AlertReader, AlertStore};
use crate::time::{SystemTimeProvider, TimeProvider};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AlertConfig>,
    pub parser: Arc<AlertParser>,
    pub enricher: Arc<AlertEnricher>,
    pub store: Arc<AlertStore>,
    pub reader: Arc<AlertReader>,
}

impl AppState {
    /// Wire the pipeline around an already constructed backend
    pub fn new(
        config: Arc<AlertConfig>,
        backend: Backend,
        clock: Arc<dyn TimeProvider>,
    ) -> Result<Self> {
        let parser = Arc::new(AlertParser::new()?);
        let enricher = Arc::new(AlertEnricher::new(
            config.alerts.source.clone(),
            clock.clone(),
        ));
        let store = Arc::new(AlertStore::new(
            backend,
            config.alerts.index_key.clone(),
            config.alerts.max_alerts,
            clock,
        ));
        let reader = Arc::new(AlertReader::new(store.clone()));

        Ok(Self {
            config,
            parser,
            enricher,
            store,
            reader,
        })
    }

    /// Connect the configured backend and build state on the wall clock
    pub async fn from_config(config: AlertConfig) -> Result<Self> {
        let backend = connect_backend(&config).await?;
        Self::new(Arc::new(config), backend, Arc::new(SystemTimeProvider))
    }

    pub fn backend(&self) -> &Backend {
        self.store.backend()
    }
}

/// Backend for the given config; unconfigured only when explicitly allowed
pub async fn connect_backend(config: &AlertConfig) -> Result<Backend> {
    let options = config.backend.options();
    let backend = match config.backend.connection_string() {
        Some(url) => Backend::connect(url, &options).await?,
        None if options.kind == BackendKind::Memory => Backend::connect("", &options).await?,
        None if config.backend.allow_unconfigured => {
            warn!("No backend configured, alerts will not be persisted");
            Backend::Unconfigured
        },
        None => {
            return Err(AlertError::Config(format!(
                "{} environment variable is not defined",
                BACKEND_URL_ENV
            )))
        },
    };

    info!("Backend: {}", backend.describe());
    Ok(backend)
}
