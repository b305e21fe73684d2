//! Alert Service Library
//!
//! Receives webhook trading alerts (JSON or templated text), stores them in
//! a Redis-compatible backend under a capped recency index and serves the
//! most recent ones back.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod services;
pub mod time;

pub use app_state::{connect_backend, AppState};
pub use config::AlertConfig;
pub use domain::{AlertRecord, Payload};
pub use error::{AlertError, ApiError, Result};
pub use services::{AlertEnricher, AlertParser, AlertReader, AlertStore, RecentAlerts};
pub use time::{FixedTimeProvider, SteppingTimeProvider, SystemTimeProvider, TimeProvider};
