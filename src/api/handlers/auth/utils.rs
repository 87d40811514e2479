//! Shared helpers for auth handlers.

use crate::auth::AuthError;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use tracing::error;

/// Map a service error to an HTTP status and a client-safe message.
///
/// Store failures are logged here and surfaced as an opaque 500; the other
/// variants carry messages that are already safe to return.
pub(super) fn error_response(err: &AuthError) -> (StatusCode, String) {
    match err {
        AuthError::InvalidInput(message) => (StatusCode::BAD_REQUEST, (*message).to_string()),
        AuthError::CaptchaFailed => (
            StatusCode::BAD_REQUEST,
            "Captcha verification failed".to_string(),
        ),
        AuthError::UsernameTaken => (StatusCode::CONFLICT, "Username already taken".to_string()),
        AuthError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
        }
        AuthError::SessionExpiredOrInvalid => (
            StatusCode::UNAUTHORIZED,
            "Session expired or invalid".to_string(),
        ),
        AuthError::InvalidRefreshToken => {
            (StatusCode::UNAUTHORIZED, "Invalid refresh token".to_string())
        }
        AuthError::Store(err) => {
            error!("Auth backend failure: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_string(),
            )
        }
    }
}

/// Extract a bearer token from the Authorization header.
pub(super) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Extract a client IP for captcha verification from common proxy headers.
pub(super) fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
