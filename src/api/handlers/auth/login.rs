//! SRP login endpoints.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use super::types::{
    LoginFinishRequest, LoginFinishResponse, LoginStartRequest, LoginStartResponse,
};
use super::utils::{error_response, extract_client_ip};
use crate::auth::AuthenticationService;

#[utoipa::path(
    post,
    path = "/v1/auth/login/start",
    request_body = LoginStartRequest,
    responses(
        (status = 200, description = "Login challenge issued", body = LoginStartResponse),
        (status = 400, description = "Validation or captcha error", body = String)
    ),
    tag = "auth"
)]
pub async fn login_start(
    headers: HeaderMap,
    service: Extension<Arc<AuthenticationService>>,
    payload: Option<Json<LoginStartRequest>>,
) -> impl IntoResponse {
    let request: LoginStartRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let client_ip = extract_client_ip(&headers);
    // Unknown usernames get a decoy challenge from the service, so every
    // well-formed request answers 200.
    match service
        .login_step1(
            &request.username,
            &request.captcha_token,
            client_ip.as_deref(),
        )
        .await
    {
        Ok(challenge) => (
            StatusCode::OK,
            Json(LoginStartResponse {
                session_id: challenge.session_id,
                salt: challenge.salt,
                server_public: challenge.server_public,
            }),
        )
            .into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/login/finish",
    request_body = LoginFinishRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginFinishResponse),
        (status = 400, description = "Validation error", body = String),
        (status = 401, description = "Invalid credentials or expired session", body = String)
    ),
    tag = "auth"
)]
pub async fn login_finish(
    service: Extension<Arc<AuthenticationService>>,
    payload: Option<Json<LoginFinishRequest>>,
) -> impl IntoResponse {
    let request: LoginFinishRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let result = service
        .login_step2(
            &request.session_id,
            &request.client_public,
            &request.client_proof,
        )
        .await;

    match result {
        Ok(login) => (
            StatusCode::OK,
            Json(LoginFinishResponse {
                server_proof: login.server_proof,
                access_token: login.tokens.access_token,
                refresh_token: login.tokens.refresh_token,
            }),
        )
            .into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}
