use crate::store::{hash_token, refresh_record_key, EphemeralSessionStore};
use crate::token::error::Error;
use crate::token::jwt::{sign_hs256, verify_hs256, SessionTokenClaims, TokenType, TOKEN_VERSION};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use ulid::Ulid;
use uuid::Uuid;

/// Current time as unix seconds.
#[must_use]
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
}

/// One freshly minted access + refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs session tokens and keeps the per-user refresh-token record in
/// lockstep with the refresh token's own expiry.
pub struct TokenIssuer {
    secret: SecretString,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    sessions: Arc<dyn EphemeralSessionStore>,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(
        secret: SecretString,
        access_ttl_seconds: i64,
        refresh_ttl_seconds: i64,
        sessions: Arc<dyn EphemeralSessionStore>,
    ) -> Self {
        Self {
            secret,
            access_ttl_seconds,
            refresh_ttl_seconds,
            sessions,
        }
    }

    /// Issue an access + refresh pair and persist the refresh-token record.
    ///
    /// The record's TTL equals the refresh token's cryptographic TTL; a skew
    /// here makes tokens get rejected early or outlive their record.
    ///
    /// # Errors
    ///
    /// Fails if signing fails or the record cannot be persisted.
    pub async fn issue(&self, user_id: Uuid, username: &str) -> Result<TokenPair> {
        let now = unix_now();
        let access_token = self.sign(user_id, username, TokenType::Access, now)?;
        let refresh_token = self.sign(user_id, username, TokenType::Refresh, now)?;

        let ttl = Duration::from_secs(u64::try_from(self.refresh_ttl_seconds).unwrap_or(0));
        self.sessions
            .set_with_ttl(
                &refresh_record_key(user_id),
                &hash_token(&refresh_token),
                ttl,
            )
            .await
            .context("failed to persist refresh token record")?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify signature, expiry, and token type.
    ///
    /// # Errors
    ///
    /// Returns the token-layer error; callers surface it generically.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<SessionTokenClaims, Error> {
        let claims = verify_hs256(token, self.secret.expose_secret().as_bytes(), unix_now())?;
        if claims.typ != expected {
            return Err(Error::WrongTokenType);
        }
        Ok(claims)
    }

    fn sign(
        &self,
        user_id: Uuid,
        username: &str,
        typ: TokenType,
        now: i64,
    ) -> Result<String, Error> {
        let ttl = match typ {
            TokenType::Access => self.access_ttl_seconds,
            TokenType::Refresh => self.refresh_ttl_seconds,
        };
        let claims = SessionTokenClaims {
            v: TOKEN_VERSION,
            sub: user_id.to_string(),
            username: username.to_string(),
            typ,
            iat: now,
            exp: now + ttl,
            jti: Ulid::new().to_string(),
        };
        sign_hs256(self.secret.expose_secret().as_bytes(), &claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryEphemeralStore;

    fn issuer(sessions: Arc<dyn EphemeralSessionStore>) -> TokenIssuer {
        TokenIssuer::new(
            SecretString::from("issuer-test-secret".to_string()),
            900,
            3600,
            sessions,
        )
    }

    #[tokio::test]
    async fn issue_persists_hashed_refresh_record() -> Result<()> {
        let sessions: Arc<dyn EphemeralSessionStore> = Arc::new(MemoryEphemeralStore::new());
        let issuer = issuer(sessions.clone());
        let user_id = Uuid::new_v4();

        let pair = issuer.issue(user_id, "alice").await?;

        let stored = sessions.get(&refresh_record_key(user_id)).await?;
        assert_eq!(stored, Some(hash_token(&pair.refresh_token)));
        // Only the hash is stored, never the raw token.
        assert_ne!(stored, Some(pair.refresh_token.clone()));
        Ok(())
    }

    #[tokio::test]
    async fn issued_tokens_verify_with_matching_type() -> Result<()> {
        let sessions: Arc<dyn EphemeralSessionStore> = Arc::new(MemoryEphemeralStore::new());
        let issuer = issuer(sessions);
        let user_id = Uuid::new_v4();

        let pair = issuer.issue(user_id, "alice").await?;

        let access = issuer.verify(&pair.access_token, TokenType::Access)?;
        assert_eq!(access.sub, user_id.to_string());
        assert_eq!(access.username, "alice");

        let refresh = issuer.verify(&pair.refresh_token, TokenType::Refresh)?;
        assert_eq!(refresh.exp - refresh.iat, 3600);
        Ok(())
    }

    #[tokio::test]
    async fn verify_rejects_type_confusion() -> Result<()> {
        let sessions: Arc<dyn EphemeralSessionStore> = Arc::new(MemoryEphemeralStore::new());
        let issuer = issuer(sessions);

        let pair = issuer.issue(Uuid::new_v4(), "alice").await?;

        assert!(matches!(
            issuer.verify(&pair.refresh_token, TokenType::Access),
            Err(Error::WrongTokenType)
        ));
        assert!(matches!(
            issuer.verify(&pair.access_token, TokenType::Refresh),
            Err(Error::WrongTokenType)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn reissue_overwrites_refresh_record() -> Result<()> {
        let sessions: Arc<dyn EphemeralSessionStore> = Arc::new(MemoryEphemeralStore::new());
        let issuer = issuer(sessions.clone());
        let user_id = Uuid::new_v4();

        let first = issuer.issue(user_id, "alice").await?;
        let second = issuer.issue(user_id, "alice").await?;
        assert_ne!(first.refresh_token, second.refresh_token);

        let stored = sessions.get(&refresh_record_key(user_id)).await?;
        assert_eq!(stored, Some(hash_token(&second.refresh_token)));
        Ok(())
    }
}
