//! # Pruvo (SRP authentication and session tokens)
//!
//! `pruvo` authenticates users with the **SRP-6a** password-authenticated key
//! exchange: the server stores a salted verifier, never the password, and a
//! login is a two-step challenge/proof handshake. Passwords never leave the
//! client, and a database leak exposes nothing directly usable for login.
//!
//! ## Session tokens
//!
//! A successful handshake mints a short-lived **access token** and a
//! long-lived **refresh token** (HS256 JWTs). Refresh tokens are single-use:
//! each rotation blacklists the spent token and records the replacement, so a
//! stolen-then-superseded token is detected and revokes the whole chain.
//!
//! ## Registration
//!
//! Signup takes a username plus a client-computed salt and verifier, gated by
//! a captcha so the endpoint cannot be used to farm accounts. Unknown
//! usernames at login receive a decoy challenge, preventing account
//! enumeration.

pub mod api;
pub mod auth;
pub mod cli;
pub mod srp;
pub mod store;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
