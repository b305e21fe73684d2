//! Key-value backend abstraction for the alert service
//!
//! Provides a small async interface over a Redis-compatible store,
//! supporting multiple backends (REST, native Redis, in-memory).
//!
//! # Key Components
//!
//! - **KvStore trait**: the command subset the service uses
//!   (GET/SET/LPUSH/LRANGE/LTRIM/KEYS)
//! - **Backend**: configured store or explicit degraded mode
//! - **ConnectionInfo**: connection string to REST endpoint + token

pub mod traits;

#[cfg(feature = "rest-backend")]
pub mod rest_impl;

#[cfg(feature = "redis-backend")]
pub mod redis_impl;

pub mod memory_impl;

pub mod backend;

pub mod connection;

pub mod error;

// Re-exports
pub use backend::{Backend, BackendKind, BackendOptions};
pub use connection::{ConnectionInfo, TokenScheme};
pub use error::{KvError, Result};
pub use memory_impl::{MemoryKv, MemoryStats};
pub use traits::KvStore;

#[cfg(feature = "rest-backend")]
pub use rest_impl::RestKv;

#[cfg(feature = "redis-backend")]
pub use redis_impl::RedisKv;
