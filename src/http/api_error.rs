use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::{ParamError, SearchError};

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned by the HTTP handlers.
///
/// Conversions are explicit through [`IntoApiError::api_err`] instead of `From`
/// so every `?` in a handler states which status it maps to.
#[derive(Debug, thiserror::Error)]
#[error("api error {status_code}: {source}")]
pub struct ApiError {
    status_code: StatusCode,
    source: BoxedError,
}

impl ApiError {
    pub fn new(source: impl Into<BoxedError>, status_code: StatusCode) -> Self {
        Self {
            status_code,
            source: source.into(),
        }
    }

    pub fn bad_request(source: impl Into<BoxedError>) -> Self {
        Self::new(source, StatusCode::BAD_REQUEST)
    }

    pub fn internal(source: impl Into<BoxedError>) -> Self {
        Self::new(source, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// Client errors explain themselves, server errors stay opaque
    fn public_message(&self) -> String {
        match self.status_code {
            StatusCode::GATEWAY_TIMEOUT => "Search timed out".to_string(),
            status if status.is_server_error() => "Search failed".to_string(),
            _ => self.source.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status_code.is_server_error() {
            log::error!("Internal API error {}: {}", self.status_code, self.source);
        } else {
            log::warn!("API error {}: {}", self.status_code, self.source);
        }

        let body = Json(json!({ "error": self.public_message() }));
        (self.status_code, body).into_response()
    }
}

pub trait IntoApiError {
    fn api_err(self) -> ApiError;
}

/// Allows using `.api_err()` on results
pub trait ResultIntoApiError<T> {
    fn api_err(self) -> Result<T, ApiError>;
}

impl<T, E: IntoApiError> ResultIntoApiError<T> for Result<T, E> {
    fn api_err(self) -> Result<T, ApiError> {
        self.map_err(IntoApiError::api_err)
    }
}

impl IntoApiError for ParamError {
    fn api_err(self) -> ApiError {
        ApiError::bad_request(self)
    }
}

impl IntoApiError for SearchError {
    fn api_err(self) -> ApiError {
        match self {
            SearchError::Timeout(_) => ApiError::new(self, StatusCode::GATEWAY_TIMEOUT),
            _ => ApiError::internal(self),
        }
    }
}
