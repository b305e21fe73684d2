//! Error types for alert-kv

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KvError {
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Unexpected reply for {command}: {reply}")]
    UnexpectedReply { command: String, reply: String },

    #[error("Invalid key pattern: {0}")]
    InvalidPattern(String),

    #[cfg(feature = "redis-backend")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "rest-backend")]
impl From<reqwest::Error> for KvError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            KvError::Transport(format!("request timed out: {}", err))
        } else if err.is_connect() {
            KvError::Transport(format!("connection failed: {}", err))
        } else {
            KvError::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, KvError>;
