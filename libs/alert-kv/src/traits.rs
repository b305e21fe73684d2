//! Trait definitions for the key-value backend abstraction

use async_trait::async_trait;

use crate::error::Result;

/// Key-value store used by the alert service
///
/// Covers exactly the command subset the service relies on: string
/// values, a single list used as a capped index, and key listing for
/// diagnostics. List semantics follow Redis (LPUSH prepends, LRANGE and
/// LTRIM take inclusive, possibly negative, indices).
///
/// Implementations:
/// - `RestKv`: REST endpoint speaking the Upstash command protocol
/// - `RedisKv`: native Redis connection
/// - `MemoryKv`: in-memory backend for testing
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Short backend name for logs and health output
    fn name(&self) -> &'static str;

    // ========== String Operations ==========

    /// Get value by key (Redis GET)
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set value for key, overwriting any previous value (Redis SET)
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    // ========== List Operations ==========

    /// Push value to the head of a list (Redis LPUSH)
    ///
    /// Returns the list length after the push.
    async fn lpush(&self, key: &str, value: &str) -> Result<u64>;

    /// Get list range, both ends inclusive (Redis LRANGE)
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>>;

    /// Trim list to the inclusive range (Redis LTRIM)
    async fn ltrim(&self, key: &str, start: isize, stop: isize) -> Result<()>;

    // ========== Key Scanning ==========

    /// List keys matching a glob pattern (Redis KEYS)
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;
}
