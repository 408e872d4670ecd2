use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::classifier::ClassifierError;
use crate::ingest::CsvError;
use crate::models::ErrorDetail;

/// Error returned by the HTTP handlers.
///
/// Every variant renders as `{"detail": "..."}` so the dashboard can show it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Bad request: {}", msg);
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Unprocessable entity: {}", msg);
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Internal error: {}", msg);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// The underlying cause is logged but not exposed.
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        tracing::error!("Service unavailable: {}", msg.into());
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Sentiment model is unavailable, please try again later",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorDetail { detail: self.detail })).into_response()
    }
}

impl From<CsvError> for ApiError {
    fn from(err: CsvError) -> Self {
        match err {
            CsvError::MissingReviewColumn | CsvError::Empty => ApiError::bad_request(err.to_string()),
            CsvError::Encoding(_) | CsvError::Malformed(_) => {
                ApiError::internal(format!("Error processing CSV: {}", err))
            }
        }
    }
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        ApiError::service_unavailable(err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        let detail = err.body_text();
        if status.is_server_error() {
            tracing::error!("Multipart read failed: {}", detail);
        } else {
            tracing::warn!("Multipart read failed: {}", detail);
        }
        ApiError::new(status, detail)
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        let status = rejection.status();
        let detail = rejection.body_text();
        tracing::warn!("Rejected upload body: {}", detail);
        ApiError::new(status, detail)
    }
}
