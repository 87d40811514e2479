//! Error taxonomy for authentication flows.
//!
//! `InvalidCredentials` deliberately merges unknown username, wrong proof,
//! and decoy handshakes so callers cannot build an oracle from the error.
//! Infrastructure failures stay outside the taxonomy in the `Store` variant
//! and propagate for retry at a higher layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid request: {0}")]
    InvalidInput(&'static str),
    #[error("captcha verification failed")]
    CaptchaFailed,
    #[error("username already taken")]
    UsernameTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("session expired or invalid")]
    SessionExpiredOrInvalid,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
