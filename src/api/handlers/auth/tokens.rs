//! Refresh-token rotation and logout endpoints.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use uuid::Uuid;

use super::types::{LogoutRequest, RefreshRequest, RefreshResponse};
use super::utils::error_response;
use crate::auth::AuthenticationService;

#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair issued", body = RefreshResponse),
        (status = 400, description = "Validation error", body = String),
        (status = 401, description = "Invalid refresh token", body = String)
    ),
    tag = "auth"
)]
pub async fn refresh(
    service: Extension<Arc<AuthenticationService>>,
    payload: Option<Json<RefreshRequest>>,
) -> impl IntoResponse {
    let request: RefreshRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    match service.refresh_tokens(&request.refresh_token).await {
        Ok(pair) => (
            StatusCode::OK,
            Json(RefreshResponse {
                access_token: pair.access_token,
                refresh_token: pair.refresh_token,
            }),
        )
            .into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    request_body = LogoutRequest,
    responses(
        (status = 204, description = "Session ended"),
        (status = 400, description = "Validation error", body = String)
    ),
    tag = "auth"
)]
pub async fn logout(
    service: Extension<Arc<AuthenticationService>>,
    payload: Option<Json<LogoutRequest>>,
) -> impl IntoResponse {
    let request: LogoutRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let Ok(user_id) = Uuid::parse_str(&request.user_id) else {
        return (StatusCode::BAD_REQUEST, "Invalid user id".to_string()).into_response();
    };

    // Logout is idempotent: already-dead tokens still answer 204.
    match service
        .logout(user_id, request.refresh_token.as_deref())
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}
