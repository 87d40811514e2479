//! Store contracts for durable credentials and ephemeral session state.
//!
//! Both stores are consumed as trait objects so the service core never
//! depends on a concrete backend: credentials live in PostgreSQL in
//! production and in memory for tests; the ephemeral TTL store ships with an
//! in-process implementation. The ephemeral contract is single-key
//! get/set/delete plus `take` (fetch-and-delete), which single-use handshake
//! sessions rely on. No cross-key transactions are required.

mod memory;
mod postgres;

pub use memory::{MemoryCredentialStore, MemoryEphemeralStore};
pub use postgres::PostgresCredentialStore;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;
use uuid::Uuid;

/// Durable record created at registration. Never holds the plaintext
/// password and is not mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub user_id: Uuid,
    /// Unique, lowercase-normalized.
    pub username: String,
    /// Hex-encoded.
    pub salt: String,
    /// Hex-encoded SRP verifier.
    pub verifier: String,
}

/// Outcome of a credential insert; uniqueness is enforced by the store.
#[derive(Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    Conflict,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, username: &str) -> Result<Option<CredentialRecord>>;
    async fn insert(&self, record: CredentialRecord) -> Result<InsertOutcome>;
}

/// TTL-based key-value store for handshake state, refresh-token records, and
/// the revocation blacklist. An expired entry must behave exactly like a
/// missing one.
#[async_trait]
pub trait EphemeralSessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
    /// Fetch and delete in one step; single-use keys rely on this.
    async fn take(&self, key: &str) -> Result<Option<String>>;
    async fn delete(&self, key: &str) -> Result<()>;
}

pub fn handshake_key(session_id: &str) -> String {
    format!("srp:handshake:{session_id}")
}

pub fn refresh_record_key(user_id: Uuid) -> String {
    format!("refresh:{user_id}")
}

pub fn revoked_token_key(token: &str) -> String {
    format!("revoked:{}", hash_token(token))
}

/// SHA-256 hex of a token; raw tokens never touch a store.
#[must_use]
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_token_is_stable_and_distinct() {
        let first = hash_token("token");
        let second = hash_token("token");
        let different = hash_token("other");
        assert_eq!(first, second);
        assert_ne!(first, different);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn keys_are_namespaced() {
        let user_id = Uuid::nil();
        assert!(handshake_key("abc").starts_with("srp:handshake:"));
        assert_eq!(
            refresh_record_key(user_id),
            format!("refresh:{user_id}")
        );
        assert!(revoked_token_key("t").starts_with("revoked:"));
        // The raw token must not appear in the blacklist key.
        assert!(!revoked_token_key("secret-token").contains("secret-token"));
    }

    #[test]
    fn insert_outcome_debug_names() {
        assert_eq!(format!("{:?}", InsertOutcome::Created), "Created");
        assert_eq!(format!("{:?}", InsertOutcome::Conflict), "Conflict");
    }
}
