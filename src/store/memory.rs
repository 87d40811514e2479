//! In-process store implementations.
//!
//! `MemoryEphemeralStore` is the default ephemeral backend: handshake state
//! is short-lived and per-instance, so an in-process TTL map is enough.
//! Clustered deployments can substitute any `EphemeralSessionStore` backed by
//! a shared store. `MemoryCredentialStore` exists for tests and development.

use super::{CredentialRecord, CredentialStore, EphemeralSessionStore, InsertOutcome};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// TTL-based in-memory key-value store.
#[derive(Default)]
pub struct MemoryEphemeralStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryEphemeralStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EphemeralSessionStore for MemoryEphemeralStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                // Expired entries behave exactly like missing ones.
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().await;
        match entries.remove(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value)),
            _ => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// In-memory credential store for tests and development.
#[derive(Default)]
pub struct MemoryCredentialStore {
    records: Mutex<HashMap<String, CredentialRecord>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, username: &str) -> Result<Option<CredentialRecord>> {
        Ok(self.records.lock().await.get(username).cloned())
    }

    async fn insert(&self, record: CredentialRecord) -> Result<InsertOutcome> {
        let mut records = self.records.lock().await;
        if records.contains_key(&record.username) {
            return Ok(InsertOutcome::Conflict);
        }
        records.insert(record.username.clone(), record);
        Ok(InsertOutcome::Created)
    }
}
