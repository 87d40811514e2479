use axum::response::IntoResponse;

/// Undocumented index route; answers with the service name and version so
/// probes hitting `/` get something other than a 404.
pub async fn root() -> impl IntoResponse {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn root_answers_with_name_and_version() {
        let response = root().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
