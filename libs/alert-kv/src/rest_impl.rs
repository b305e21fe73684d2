//! REST implementation of the KvStore trait
//!
//! Speaks the Upstash command protocol: every command is a `POST` to the
//! endpoint root with a JSON array body (`["LPUSH","alerts","alert:1"]`)
//! and a bearer token. Replies are `{"result": ...}` or `{"error": "..."}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::trace;

use crate::connection::ConnectionInfo;
use crate::error::{KvError, Result};
use crate::traits::KvStore;

/// Reply envelope returned by the REST endpoint
#[derive(Debug, Deserialize)]
struct RestReply {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

/// REST-backed key-value store
pub struct RestKv {
    client: Client,
    info: ConnectionInfo,
}

impl RestKv {
    /// Create a client for the given endpoint with a per-request timeout
    pub fn new(info: ConnectionInfo, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, info })
    }

    /// Endpoint this client talks to
    pub fn rest_url(&self) -> &str {
        &self.info.rest_url
    }

    async fn command(&self, args: &[&str]) -> Result<Value> {
        let name = args.first().copied().unwrap_or_default();
        trace!("REST command {} -> {}", name, self.info.rest_url);

        let response = self
            .client
            .post(&self.info.rest_url)
            .bearer_auth(&self.info.token)
            .json(args)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        decode_reply(name, status.as_u16(), &body)
    }
}

/// Decode a raw reply body into the `result` value
fn decode_reply(command: &str, status: u16, body: &str) -> Result<Value> {
    let reply: RestReply = serde_json::from_str(body).map_err(|_| {
        KvError::Backend(format!("{} failed with HTTP {}: {}", command, status, body.trim()))
    })?;

    if let Some(error) = reply.error {
        return Err(KvError::Backend(error));
    }
    if !(200..300).contains(&status) {
        return Err(KvError::Backend(format!("{} failed with HTTP {}", command, status)));
    }

    Ok(reply.result)
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn expect_list(command: &str, value: Value) -> Result<Vec<String>> {
    match value {
        Value::Array(items) => Ok(items.into_iter().map(value_to_string).collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(KvError::UnexpectedReply {
            command: command.to_string(),
            reply: other.to_string(),
        }),
    }
}

fn expect_ok(command: &str, value: Value) -> Result<()> {
    match value {
        Value::String(ref s) if s == "OK" => Ok(()),
        other => Err(KvError::UnexpectedReply {
            command: command.to_string(),
            reply: other.to_string(),
        }),
    }
}

#[async_trait]
impl KvStore for RestKv {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.command(&["GET", key]).await? {
            Value::Null => Ok(None),
            value => Ok(Some(value_to_string(value))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let reply = self.command(&["SET", key, value]).await?;
        expect_ok("SET", reply)
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<u64> {
        let reply = self.command(&["LPUSH", key, value]).await?;
        reply.as_u64().ok_or_else(|| KvError::UnexpectedReply {
            command: "LPUSH".to_string(),
            reply: reply.to_string(),
        })
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let (start, stop) = (start.to_string(), stop.to_string());
        let reply = self.command(&["LRANGE", key, &start, &stop]).await?;
        expect_list("LRANGE", reply)
    }

    async fn ltrim(&self, key: &str, start: isize, stop: isize) -> Result<()> {
        let (start, stop) = (start.to_string(), stop.to_string());
        let reply = self.command(&["LTRIM", key, &start, &stop]).await?;
        expect_ok("LTRIM", reply)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let reply = self.command(&["KEYS", pattern]).await?;
        expect_list("KEYS", reply)
    }
}
