use axum::http::StatusCode;

/// Liveness only; no downstream calls.
pub async fn up() -> StatusCode {
    StatusCode::OK
}
