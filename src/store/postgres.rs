//! PostgreSQL-backed credential store.

use super::{CredentialRecord, CredentialStore, InsertOutcome};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::Instrument;

/// Credential records in a `credentials` table with a unique index on
/// `username`; uniqueness is enforced by the database, not check-then-insert.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn get(&self, username: &str) -> Result<Option<CredentialRecord>> {
        let query = "SELECT user_id, username, salt, verifier FROM credentials WHERE username = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup credential record")?;

        Ok(row.map(|row| CredentialRecord {
            user_id: row.get("user_id"),
            username: row.get("username"),
            salt: row.get("salt"),
            verifier: row.get("verifier"),
        }))
    }

    async fn insert(&self, record: CredentialRecord) -> Result<InsertOutcome> {
        let query = r"
            INSERT INTO credentials (user_id, username, salt, verifier)
            VALUES ($1, $2, $3, $4)
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(record.user_id)
            .bind(&record.username)
            .bind(&record.salt)
            .bind(&record.verifier)
            .execute(&self.pool)
            .instrument(span)
            .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Created),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Conflict),
            Err(err) => Err(err).context("failed to insert credential record"),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
