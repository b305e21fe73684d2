//! In-memory KvStore implementation
//!
//! Uses DashMap for concurrent access, with one lock per list so that each
//! list command is atomic like it is on a real backend.
//! Perfect for testing and local development.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::{KvError, Result};
use crate::traits::KvStore;

/// In-memory key-value store with Redis list semantics
#[derive(Clone, Default)]
pub struct MemoryKv {
    kv_store: Arc<DashMap<String, String>>,
    list_store: Arc<DashMap<String, RwLock<VecDeque<String>>>>,
}

impl MemoryKv {
    /// Create new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.kv_store.clear();
        self.list_store.clear();
    }

    /// Get statistics about stored data
    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            kv_count: self.kv_store.len(),
            list_count: self.list_store.len(),
        }
    }
}

/// Statistics about memory store usage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStats {
    pub kv_count: usize,
    pub list_count: usize,
}

/// Resolve Redis-style inclusive indices against a list length
///
/// Returns the half-open `[start, end)` range, or `None` when empty.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len {
        None
    } else {
        Some((start as usize, stop as usize + 1))
    }
}

/// Translate a Redis glob (`*`, `?`, `[...]`) into an anchored regex
fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push_str(&regex::escape(&next.to_string()));
                }
            },
            '[' => {
                out.push('[');
                if chars.peek() == Some(&'^') {
                    chars.next();
                    out.push('^');
                }
                for inner in chars.by_ref() {
                    if inner == ']' {
                        break;
                    }
                    if inner == '\\' || inner == '[' {
                        out.push('\\');
                    }
                    out.push(inner);
                }
                out.push(']');
            },
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }

    out.push('$');
    Regex::new(&out).map_err(|e| KvError::InvalidPattern(format!("{}: {}", pattern, e)))
}

#[async_trait]
impl KvStore for MemoryKv {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.kv_store.get(key).map(|v| v.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.kv_store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<u64> {
        let list = self.list_store.entry(key.to_string()).or_default();
        let mut list = list.write();
        list.push_front(value.to_string());
        Ok(list.len() as u64)
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let Some(list) = self.list_store.get(key) else {
            return Ok(Vec::new());
        };
        let list = list.read();

        Ok(match resolve_range(list.len(), start, stop) {
            Some((from, to)) => list.range(from..to).cloned().collect(),
            None => Vec::new(),
        })
    }

    async fn ltrim(&self, key: &str, start: isize, stop: isize) -> Result<()> {
        let now_empty = match self.list_store.get(key) {
            Some(list) => {
                let mut list = list.write();
                match resolve_range(list.len(), start, stop) {
                    Some((from, to)) => {
                        list.truncate(to);
                        list.drain(..from);
                    },
                    None => list.clear(),
                }
                list.is_empty()
            },
            None => false,
        };

        // Redis deletes a list key once it holds no elements
        if now_empty {
            self.list_store
                .remove_if(key, |_, list| list.read().is_empty());
        }
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let re = glob_to_regex(pattern)?;

        let mut matches: Vec<String> = self
            .kv_store
            .iter()
            .map(|entry| entry.key().clone())
            .chain(self.list_store.iter().map(|entry| entry.key().clone()))
            .filter(|key| re.is_match(key))
            .collect();
        matches.sort();
        Ok(matches)
    }
}
