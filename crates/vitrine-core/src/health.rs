use axum::http::StatusCode;

/// Handler for `GET /healthz`. The process is up.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
