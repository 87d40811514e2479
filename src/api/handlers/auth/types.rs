//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    /// Hex-encoded salt chosen by the client.
    pub salt: String,
    /// Hex-encoded SRP verifier derived client-side; the password itself is
    /// never sent.
    pub verifier: String,
    pub captcha_token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub user_id: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginStartRequest {
    pub username: String,
    pub captcha_token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginStartResponse {
    pub session_id: String,
    /// Hex-encoded salt.
    pub salt: String,
    /// Hex-encoded server public ephemeral `B`.
    pub server_public: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginFinishRequest {
    pub session_id: String,
    /// Hex-encoded client public ephemeral `A`.
    pub client_public: String,
    /// Hex-encoded client proof `M1`.
    pub client_proof: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginFinishResponse {
    /// Hex-encoded server proof `M2`.
    pub server_proof: String,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LogoutRequest {
    pub user_id: String,
    /// Refresh token to revoke immediately; the per-user refresh record is
    /// cleared either way.
    pub refresh_token: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub user_id: String,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn register_request_round_trips() -> Result<()> {
        let request = RegisterRequest {
            username: "alice".to_string(),
            salt: "aa".to_string(),
            verifier: "bb".to_string(),
            captcha_token: "captcha".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let username = value
            .get("username")
            .and_then(serde_json::Value::as_str)
            .context("missing username")?;
        assert_eq!(username, "alice");
        let decoded: RegisterRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.verifier, "bb");
        Ok(())
    }

    #[test]
    fn login_finish_response_exposes_both_tokens() -> Result<()> {
        let response = LoginFinishResponse {
            server_proof: "cc".to_string(),
            access_token: "a.b.c".to_string(),
            refresh_token: "d.e.f".to_string(),
        };
        let value = serde_json::to_value(&response)?;
        assert!(value.get("access_token").is_some());
        assert!(value.get("refresh_token").is_some());
        assert!(value.get("server_proof").is_some());
        Ok(())
    }
}
