//! Session-scoped key/value storage for ephemeral UI state.
//!
//! Storage is a capability: a controller is handed a [`SessionStorage`] that
//! may or may not be backed by a store. An absent backend is a normal
//! condition, reads see nothing and writes report [`WriteOutcome::Unavailable`].

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("session storage quota exceeded writing '{key}': need {needed} bytes, limit {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },
    #[error("session storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Minimal string key/value store with the semantics of a browser session store.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Stored,
    Unavailable,
}

/// Optional handle to a session store.
#[derive(Clone, Default)]
pub struct SessionStorage {
    backend: Option<Arc<dyn SessionStore>>,
}

impl SessionStorage {
    pub fn new(backend: Arc<dyn SessionStore>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match &self.backend {
            Some(store) => store.get(key),
            None => Ok(None),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> StoreResult<WriteOutcome> {
        let Some(store) = &self.backend else {
            debug!(key, "session storage unavailable; skipping write");
            return Ok(WriteOutcome::Unavailable);
        };
        store.set(key, value)?;
        Ok(WriteOutcome::Stored)
    }

    pub fn remove(&self, key: &str) -> StoreResult<WriteOutcome> {
        let Some(store) = &self.backend else {
            return Ok(WriteOutcome::Unavailable);
        };
        store.remove(key)?;
        Ok(WriteOutcome::Stored)
    }
}

impl std::fmt::Debug for SessionStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStorage")
            .field("available", &self.is_available())
            .finish()
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryInner {
    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

/// In-process store living as long as the presenting session.
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<Mutex<MemoryInner>>,
    quota_bytes: Option<usize>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes pushing total key+value bytes above `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            inner: Arc::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        // A poisoned map is still a usable map.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut inner = self.lock();
        if let Some(limit) = self.quota_bytes {
            let needed = inner.used_bytes_excluding(key) + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.lock().entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
