//! Bearer session introspection.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use super::types::SessionResponse;
use super::utils::bearer_token;
use crate::auth::AuthenticationService;

#[utoipa::path(
    get,
    path = "/v1/auth/session",
    responses(
        (status = 200, description = "Access token is valid", body = SessionResponse),
        (status = 204, description = "No valid access token")
    ),
    tag = "auth"
)]
pub async fn session(
    headers: HeaderMap,
    service: Extension<Arc<AuthenticationService>>,
) -> impl IntoResponse {
    // A missing or invalid token is "no session", never an error; this
    // endpoint must not leak why validation failed.
    let Some(token) = bearer_token(&headers) else {
        return StatusCode::NO_CONTENT.into_response();
    };
    match service.validate_token(token) {
        Some(identity) => (
            StatusCode::OK,
            Json(SessionResponse {
                user_id: identity.user_id.to_string(),
                username: identity.username,
            }),
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
