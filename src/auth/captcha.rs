//! Registration gate: captcha verification.
//!
//! Registration requires a captcha response so the endpoint cannot be used to
//! farm accounts. The verifier is a trait object so deployments can plug in
//! any provider; the HTTP implementation speaks the common
//! `POST {secret, response, remoteip}` form protocol shared by the major
//! captcha services.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::warn;
use url::Url;

#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// `true` when the captcha response checks out. Implementations must
    /// fail closed: a provider outage denies registration, it never admits.
    async fn verify(&self, response: &str, remote_ip: Option<&str>) -> bool;
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
}

/// Verifier backed by a remote captcha provider.
pub struct HttpCaptchaVerifier {
    client: reqwest::Client,
    verify_url: Url,
    secret: SecretString,
}

impl HttpCaptchaVerifier {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(verify_url: Url, secret: SecretString) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            verify_url,
            secret,
        })
    }
}

#[async_trait]
impl CaptchaVerifier for HttpCaptchaVerifier {
    async fn verify(&self, response: &str, remote_ip: Option<&str>) -> bool {
        let mut form = vec![
            ("secret", self.secret.expose_secret().to_string()),
            ("response", response.to_string()),
        ];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip.to_string()));
        }

        let result = self
            .client
            .post(self.verify_url.clone())
            .form(&form)
            .send()
            .await;

        match result {
            Ok(resp) => match resp.json::<VerifyResponse>().await {
                Ok(body) => body.success,
                Err(err) => {
                    warn!("captcha provider returned unparseable body: {err}");
                    false
                }
            },
            Err(err) => {
                warn!("captcha verification request failed: {err}");
                false
            }
        }
    }
}

/// Accepts every captcha response. Development and tests only.
pub struct NoopCaptchaVerifier;

#[async_trait]
impl CaptchaVerifier for NoopCaptchaVerifier {
    async fn verify(&self, _response: &str, _remote_ip: Option<&str>) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_accepts_anything() {
        let verifier = NoopCaptchaVerifier;
        assert!(verifier.verify("", None).await);
        assert!(verifier.verify("anything", Some("127.0.0.1")).await);
    }

    #[tokio::test]
    async fn http_verifier_fails_closed_when_unreachable() {
        let url = Url::parse("http://127.0.0.1:1/siteverify").expect("valid url");
        let verifier = HttpCaptchaVerifier::new(url, SecretString::from("secret".to_string()))
            .expect("client builds");
        assert!(!verifier.verify("token", None).await);
    }
}
