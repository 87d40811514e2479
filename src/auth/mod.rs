//! Authentication core.
//!
//! Orchestrates registration, the two-step SRP login handshake, refresh-token
//! rotation, and logout over the store contracts. All cryptographic failures
//! are surfaced through a small, deliberately generic error taxonomy.

pub mod captcha;
mod config;
mod error;
mod service;

pub use captcha::{CaptchaVerifier, HttpCaptchaVerifier, NoopCaptchaVerifier};
pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthenticationService, Identity, LoginChallenge, LoginProof};
