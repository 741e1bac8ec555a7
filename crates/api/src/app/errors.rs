use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use intake_core::DomainError;
use intake_infra::StoreError;
use intake_observability::{ErrorReport, ErrorReporter};

/// Every way a request can fail, translated to a status code at the edge.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad input; nothing downstream was called.
    #[error("{0}")]
    Validation(String),

    /// The product already exists (creation route only).
    #[error("{0}")]
    Conflict(String),

    /// The spreadsheet store failed during lookup or write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Only internal failures go to error tracking; client mistakes do not.
    pub fn is_reportable(&self) -> bool {
        matches!(self, ApiError::Store(_))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        json_error(self.status(), self.to_string())
    }
}

/// Report `err` if it is internal, then render it.
pub fn respond(
    reporter: &dyn ErrorReporter,
    context: &'static str,
    err: ApiError,
) -> axum::response::Response {
    if err.is_reportable() {
        let report = match &err {
            ApiError::Store(inner) => ErrorReport::from_error(inner),
            other => ErrorReport::from_error(other),
        };
        reporter.notify(report.with_context(context));
    }
    err.into_response()
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}
