//! Service configuration
//!
//! Layered with figment: built-in defaults, then an optional YAML file, then
//! `ALERTSRV_*` environment variables (`__` separates sections, e.g.
//! `ALERTSRV_SERVER__PORT=8080`), then `REDIS_URL` for the backend.

use std::path::{Path, PathBuf};
use std::time::Duration;

use alert_kv::{BackendKind, BackendOptions, TokenScheme};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{AlertError, Result};

/// Config file used when `--config` is not given and the file exists
pub const DEFAULT_CONFIG_PATH: &str = "config/alertsrv.yaml";
pub const ENV_PREFIX: &str = "ALERTSRV_";
pub const BACKEND_URL_ENV: &str = "REDIS_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub alerts: AlertsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Connection string, normally taken from `REDIS_URL`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub kind: BackendKind,
    pub token_scheme: TokenScheme,
    pub timeout_ms: u64,
    /// Run without a backend instead of refusing to start
    pub allow_unconfigured: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            kind: BackendKind::Rest,
            token_scheme: TokenScheme::Password,
            timeout_ms: 5000,
            allow_unconfigured: false,
        }
    }
}

impl BackendConfig {
    /// Connection string, treating an empty value as unset
    pub fn connection_string(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn options(&self) -> BackendOptions {
        BackendOptions {
            kind: self.kind,
            token_scheme: self.token_scheme,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// List holding alert ids, newest first
    pub index_key: String,
    pub max_alerts: usize,
    /// Value of the `source` field on every stored alert
    pub source: String,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            index_key: "alerts".to_string(),
            max_alerts: 100,
            source: "tradingview".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Also write daily rolling files here
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            dir: None,
        }
    }
}

impl AlertConfig {
    /// Load from the given file (must exist) or the default path (if present)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) if !path.exists() => {
                return Err(AlertError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            },
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|p| p.exists()),
        };

        Self::from_figment(Self::figment(file.as_deref()))
    }

    /// Provider stack, lowest precedence first
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AlertConfig::default()));
        if let Some(file) = file {
            figment = figment.merge(Yaml::file(file));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&[BACKEND_URL_ENV])
                    .map(|_| "backend.url".into()),
            )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AlertConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AlertError::Config("server.port must be greater than 0".into()));
        }
        if self.alerts.max_alerts == 0 {
            return Err(AlertError::Config("alerts.max_alerts must be at least 1".into()));
        }
        if self.alerts.index_key.trim().is_empty() {
            return Err(AlertError::Config("alerts.index_key must not be empty".into()));
        }
        if self.alerts.source.trim().is_empty() {
            return Err(AlertError::Config("alerts.source must not be empty".into()));
        }
        if self.backend.timeout_ms == 0 {
            return Err(AlertError::Config("backend.timeout_ms must be greater than 0".into()));
        }
        if self.backend.connection_string().is_none()
            && self.backend.kind != BackendKind::Memory
            && !self.backend.allow_unconfigured
        {
            return Err(AlertError::Config(format!(
                "{} environment variable is not defined",
                BACKEND_URL_ENV
            )));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
