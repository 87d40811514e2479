//! Access/refresh session tokens.
//!
//! Tokens are HS256-signed JWTs over a shared secret. Signing and
//! verification are deterministic functions of `(secret, claims, now)` so the
//! whole layer is testable without a clock or I/O; [`TokenIssuer`] adds the
//! clock and persists refresh-token records in lockstep with token expiry.

mod error;
mod issuer;
mod jwt;

pub use error::Error;
pub use issuer::{unix_now, TokenIssuer, TokenPair};
pub use jwt::{sign_hs256, verify_hs256, SessionTokenClaims, TokenType, TOKEN_VERSION};
