//! Native Redis implementation of the KvStore trait

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use crate::error::Result;
use crate::traits::KvStore;

/// Redis-backed key-value store
///
/// Uses a multiplexed `ConnectionManager`, which reconnects on its own and
/// is cheap to clone per call.
pub struct RedisKv {
    conn: ConnectionManager,
}

impl RedisKv {
    /// Connect to Redis at the given URL (`redis://` or `rediss://`)
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        info!("Connected to Redis backend");
        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for RedisKv {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.get::<_, Option<String>>(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        Ok(conn.lpush::<_, _, u64>(key, value).await?)
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.lrange::<_, Vec<String>>(key, start, stop).await?)
    }

    async fn ltrim(&self, key: &str, start: isize, stop: isize) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.ltrim::<_, ()>(key, start, stop).await?;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.keys::<_, Vec<String>>(pattern).await?)
    }
}
