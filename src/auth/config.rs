//! Authentication configuration.

use secrecy::SecretString;

const DEFAULT_ACCESS_TTL_SECONDS: i64 = 15 * 60;
const DEFAULT_REFRESH_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;
const DEFAULT_HANDSHAKE_TTL_SECONDS: u64 = 5 * 60;

/// Process-wide authentication settings, injected into the service
/// constructor rather than read from ambient globals.
#[derive(Clone)]
pub struct AuthConfig {
    token_secret: SecretString,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    handshake_ttl_seconds: u64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(token_secret: SecretString) -> Self {
        Self {
            token_secret,
            access_ttl_seconds: DEFAULT_ACCESS_TTL_SECONDS,
            refresh_ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
            handshake_ttl_seconds: DEFAULT_HANDSHAKE_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_access_ttl_seconds(mut self, seconds: i64) -> Self {
        self.access_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_refresh_ttl_seconds(mut self, seconds: i64) -> Self {
        self.refresh_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_handshake_ttl_seconds(mut self, seconds: u64) -> Self {
        self.handshake_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn token_secret(&self) -> &SecretString {
        &self.token_secret
    }

    #[must_use]
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    #[must_use]
    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }

    #[must_use]
    pub fn handshake_ttl_seconds(&self) -> u64 {
        self.handshake_ttl_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_overrides() {
        let config = AuthConfig::new(SecretString::from("secret".to_string()));
        assert_eq!(config.access_ttl_seconds(), DEFAULT_ACCESS_TTL_SECONDS);
        assert_eq!(config.refresh_ttl_seconds(), DEFAULT_REFRESH_TTL_SECONDS);
        assert_eq!(
            config.handshake_ttl_seconds(),
            DEFAULT_HANDSHAKE_TTL_SECONDS
        );

        let config = config
            .with_access_ttl_seconds(60)
            .with_refresh_ttl_seconds(120)
            .with_handshake_ttl_seconds(5);
        assert_eq!(config.access_ttl_seconds(), 60);
        assert_eq!(config.refresh_ttl_seconds(), 120);
        assert_eq!(config.handshake_ttl_seconds(), 5);
    }
}
