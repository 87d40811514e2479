//! Authentication service: registration, SRP login, token rotation, logout.

use super::captcha::CaptchaVerifier;
use super::config::AuthConfig;
use super::error::AuthError;
use crate::srp::{ServerState, SrpEngine, SrpParams};
use crate::store::{
    handshake_key, hash_token, refresh_record_key, revoked_token_key, CredentialRecord,
    CredentialStore, EphemeralSessionStore, InsertOutcome,
};
use crate::token::{unix_now, TokenIssuer, TokenPair, TokenType};
use anyhow::{anyhow, Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

const SESSION_ID_BYTES: usize = 32;
const DECOY_SEED_BYTES: usize = 32;

/// Who a validated access token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

/// Step-one reply: everything the client needs to compute its proof.
#[derive(Debug)]
pub struct LoginChallenge {
    pub session_id: String,
    pub salt: String,
    pub server_public: String,
}

/// Step-two reply: the server proof plus a fresh token pair.
#[derive(Debug)]
pub struct LoginProof {
    pub server_proof: String,
    pub tokens: TokenPair,
}

/// Handshake state parked in the ephemeral store between the two login
/// steps. `user_id` is absent for decoy handshakes, which by construction
/// can never reach token issuance.
#[derive(Serialize, Deserialize)]
struct HandshakeSession {
    user_id: Option<Uuid>,
    state: ServerState,
}

/// Ties the SRP engine, the stores, the captcha gate, and the token issuer
/// together behind one API; handlers stay thin and hold this via `Arc`.
pub struct AuthenticationService {
    credentials: Arc<dyn CredentialStore>,
    sessions: Arc<dyn EphemeralSessionStore>,
    captcha: Arc<dyn CaptchaVerifier>,
    issuer: TokenIssuer,
    srp: SrpEngine,
    handshake_ttl: Duration,
    decoy_seed: [u8; DECOY_SEED_BYTES],
}

impl AuthenticationService {
    /// # Errors
    ///
    /// Fails if the system RNG cannot seed the decoy generator.
    pub fn new(
        config: &AuthConfig,
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<dyn EphemeralSessionStore>,
        captcha: Arc<dyn CaptchaVerifier>,
    ) -> Result<Self> {
        let mut decoy_seed = [0u8; DECOY_SEED_BYTES];
        OsRng
            .try_fill_bytes(&mut decoy_seed)
            .map_err(|err| anyhow!("failed to seed decoy generator: {err}"))?;

        let issuer = TokenIssuer::new(
            config.token_secret().clone(),
            config.access_ttl_seconds(),
            config.refresh_ttl_seconds(),
            sessions.clone(),
        );

        Ok(Self {
            credentials,
            sessions,
            captcha,
            issuer,
            srp: SrpEngine::new(SrpParams::default()),
            handshake_ttl: Duration::from_secs(config.handshake_ttl_seconds()),
            decoy_seed,
        })
    }

    /// Register a new credential record.
    ///
    /// The salt and verifier are computed client-side; the password itself
    /// never reaches this service.
    ///
    /// # Errors
    ///
    /// `CaptchaFailed`, `InvalidInput`, `UsernameTaken`, or `Store`.
    pub async fn register(
        &self,
        username: &str,
        salt: &str,
        verifier: &str,
        captcha_response: &str,
        remote_ip: Option<&str>,
    ) -> Result<Uuid, AuthError> {
        if !self.captcha.verify(captcha_response, remote_ip).await {
            return Err(AuthError::CaptchaFailed);
        }

        let username = normalize_username(username)?;
        if !is_hex(salt) {
            return Err(AuthError::InvalidInput("salt must be non-empty hex"));
        }
        if !is_hex(verifier) {
            return Err(AuthError::InvalidInput("verifier must be non-empty hex"));
        }

        let record = CredentialRecord {
            user_id: Uuid::new_v4(),
            username,
            salt: salt.to_lowercase(),
            verifier: verifier.to_lowercase(),
        };
        let user_id = record.user_id;

        match self.credentials.insert(record).await? {
            InsertOutcome::Created => Ok(user_id),
            InsertOutcome::Conflict => Err(AuthError::UsernameTaken),
        }
    }

    /// Start a login handshake.
    ///
    /// Unknown usernames receive a deterministic decoy challenge with the
    /// same shape and timing as a real one, so this endpoint never reveals
    /// whether an account exists.
    ///
    /// # Errors
    ///
    /// `CaptchaFailed`, `InvalidInput`, or `Store`.
    pub async fn login_step1(
        &self,
        username: &str,
        captcha_response: &str,
        remote_ip: Option<&str>,
    ) -> Result<LoginChallenge, AuthError> {
        if !self.captcha.verify(captcha_response, remote_ip).await {
            return Err(AuthError::CaptchaFailed);
        }

        let username = normalize_username(username)?;

        let (user_id, salt, verifier) = match self.credentials.get(&username).await? {
            Some(record) => (Some(record.user_id), record.salt, record.verifier),
            None => {
                let (salt, verifier) = self.srp.decoy_credentials(&self.decoy_seed, &username);
                (None, salt, verifier)
            }
        };

        let challenge = self
            .srp
            .step1(&username, &salt, &verifier)
            .map_err(|err| anyhow!("failed to build login challenge: {err}"))?;

        let session = HandshakeSession {
            user_id,
            state: challenge.state,
        };
        let session_id = new_session_id()?;
        let serialized =
            serde_json::to_string(&session).context("failed to serialize handshake session")?;
        self.sessions
            .set_with_ttl(&handshake_key(&session_id), &serialized, self.handshake_ttl)
            .await
            .context("failed to store handshake session")?;

        Ok(LoginChallenge {
            session_id,
            salt: session.state.salt,
            server_public: challenge.server_public,
        })
    }

    /// Finish a login handshake.
    ///
    /// The parked session is consumed before the proof is checked, so one
    /// challenge admits exactly one verification attempt, pass or fail.
    ///
    /// # Errors
    ///
    /// `SessionExpiredOrInvalid` when the session is missing, expired, or
    /// already used; `InvalidCredentials` for every proof failure.
    pub async fn login_step2(
        &self,
        session_id: &str,
        client_public: &str,
        client_proof: &str,
    ) -> Result<LoginProof, AuthError> {
        let serialized = self
            .sessions
            .take(&handshake_key(session_id))
            .await
            .context("failed to load handshake session")?
            .ok_or(AuthError::SessionExpiredOrInvalid)?;
        let session: HandshakeSession = serde_json::from_str(&serialized)
            .context("failed to deserialize handshake session")?;

        let server_proof = self
            .srp
            .step2(&session.state, client_public, client_proof)
            .map_err(|_| AuthError::InvalidCredentials)?;

        // A decoy verifier cannot produce a matching proof, so this arm is
        // unreachable in practice; it guards token issuance regardless.
        let Some(user_id) = session.user_id else {
            return Err(AuthError::InvalidCredentials);
        };

        let tokens = self.issuer.issue(user_id, &session.state.username).await?;

        Ok(LoginProof {
            server_proof,
            tokens,
        })
    }

    /// Rotate a refresh token into a new token pair.
    ///
    /// A valid token that no longer matches the stored record means an older
    /// token from the same chain was presented: someone else already rotated
    /// it. The record is deleted so every holder is forced back to login.
    ///
    /// # Errors
    ///
    /// `InvalidRefreshToken` for every rejection; `Store` for backend
    /// failures.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .issuer
            .verify(refresh_token, TokenType::Refresh)
            .map_err(|_| AuthError::InvalidRefreshToken)?;
        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;

        let revoked = self
            .sessions
            .get(&revoked_token_key(refresh_token))
            .await
            .context("failed to check token blacklist")?;
        if revoked.is_some() {
            return Err(AuthError::InvalidRefreshToken);
        }

        let stored = self
            .sessions
            .get(&refresh_record_key(user_id))
            .await
            .context("failed to load refresh token record")?;
        match stored {
            Some(hash) if hash == hash_token(refresh_token) => {
                let pair = self.issuer.issue(user_id, &claims.username).await?;
                self.blacklist(refresh_token, claims.exp).await?;
                Ok(pair)
            }
            Some(_) => {
                warn!(user_id = %user_id, "stale refresh token presented, revoking chain");
                self.sessions
                    .delete(&refresh_record_key(user_id))
                    .await
                    .context("failed to revoke refresh token chain")?;
                Err(AuthError::InvalidRefreshToken)
            }
            None => Err(AuthError::InvalidRefreshToken),
        }
    }

    /// End a session. The stored refresh record is cleared unconditionally,
    /// so even a caller who lost their token ends up logged out; a supplied
    /// token is additionally blacklisted for its remaining lifetime.
    /// Idempotent: repeated or garbage-token calls are a no-op.
    ///
    /// # Errors
    ///
    /// `Store` only.
    pub async fn logout(
        &self,
        user_id: Uuid,
        refresh_token: Option<&str>,
    ) -> Result<(), AuthError> {
        self.sessions
            .delete(&refresh_record_key(user_id))
            .await
            .context("failed to delete refresh token record")?;

        if let Some(token) = refresh_token {
            if let Ok(claims) = self.issuer.verify(token, TokenType::Refresh) {
                self.blacklist(token, claims.exp).await?;
            }
        }
        Ok(())
    }

    /// Check an access token and return its identity, or `None` when the
    /// token is invalid, expired, or of the wrong type.
    #[must_use]
    pub fn validate_token(&self, access_token: &str) -> Option<Identity> {
        let claims = self.issuer.verify(access_token, TokenType::Access).ok()?;
        let user_id = Uuid::parse_str(&claims.sub).ok()?;
        Some(Identity {
            user_id,
            username: claims.username,
        })
    }

    /// Blacklist a spent token for the remainder of its own lifetime; once
    /// it expires on its own, the entry is pointless.
    async fn blacklist(&self, token: &str, exp: i64) -> Result<(), AuthError> {
        let remaining = exp.saturating_sub(unix_now()).max(1);
        let ttl = Duration::from_secs(u64::try_from(remaining).unwrap_or(1));
        self.sessions
            .set_with_ttl(&revoked_token_key(token), "1", ttl)
            .await
            .context("failed to blacklist token")?;
        Ok(())
    }
}

fn normalize_username(username: &str) -> Result<String, AuthError> {
    let username = username.trim().to_lowercase();
    if username.is_empty() {
        return Err(AuthError::InvalidInput("username must not be empty"));
    }
    Ok(username)
}

fn is_hex(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_hexdigit())
}

fn new_session_id() -> Result<String, AuthError> {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|err| anyhow!("failed to generate session id: {err}"))?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}
