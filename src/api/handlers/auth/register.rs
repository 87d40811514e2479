//! Registration endpoint.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use super::types::{RegisterRequest, RegisterResponse};
use super::utils::{error_response, extract_client_ip};
use crate::auth::AuthenticationService;

#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation or captcha error", body = String),
        (status = 409, description = "Username already taken", body = String)
    ),
    tag = "auth"
)]
pub async fn register(
    headers: HeaderMap,
    service: Extension<Arc<AuthenticationService>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let request: RegisterRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let client_ip = extract_client_ip(&headers);
    let result = service
        .register(
            &request.username,
            &request.salt,
            &request.verifier,
            &request.captcha_token,
            client_ip.as_deref(),
        )
        .await;

    match result {
        Ok(user_id) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                user_id: user_id.to_string(),
            }),
        )
            .into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthConfig, NoopCaptchaVerifier};
    use crate::store::{MemoryCredentialStore, MemoryEphemeralStore};
    use anyhow::Result;
    use secrecy::SecretString;

    fn service() -> Result<Arc<AuthenticationService>> {
        let config = AuthConfig::new(SecretString::from("handler-test-secret".to_string()));
        Ok(Arc::new(AuthenticationService::new(
            &config,
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(MemoryEphemeralStore::new()),
            Arc::new(NoopCaptchaVerifier),
        )?))
    }

    #[tokio::test]
    async fn register_missing_payload() -> Result<()> {
        let response = register(HeaderMap::new(), Extension(service()?), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn register_creates_account() -> Result<()> {
        let request = RegisterRequest {
            username: "alice".to_string(),
            salt: "aabb".to_string(),
            verifier: "ccdd".to_string(),
            captcha_token: "ok".to_string(),
        };
        let response = register(
            HeaderMap::new(),
            Extension(service()?),
            Some(Json(request)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        Ok(())
    }

    #[tokio::test]
    async fn register_duplicate_conflicts() -> Result<()> {
        let service = service()?;
        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let request = RegisterRequest {
                username: "alice".to_string(),
                salt: "aabb".to_string(),
                verifier: "ccdd".to_string(),
                captcha_token: "ok".to_string(),
            };
            let response = register(
                HeaderMap::new(),
                Extension(service.clone()),
                Some(Json(request)),
            )
            .await
            .into_response();
            assert_eq!(response.status(), expected);
        }
        Ok(())
    }
}
