//! Mapping of service errors onto HTTP responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bazaar_core::application::ApplicationError;
use serde::Serialize;
use tracing::error;

/// Error returned by request handlers
#[derive(Debug)]
pub enum ApiError {
    /// Caller identity missing or malformed
    Unauthorized(String),
    /// Error raised by a chat service
    App(ApplicationError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    code: &'static str,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::App(err) => match err {
                ApplicationError::Validation { .. } => StatusCode::BAD_REQUEST,
                ApplicationError::NotFound { .. } => StatusCode::NOT_FOUND,
                ApplicationError::Forbidden { .. } => StatusCode::FORBIDDEN,
                ApplicationError::Conflict { .. } => StatusCode::CONFLICT,
                ApplicationError::InvalidOperation { .. } => StatusCode::BAD_REQUEST,
                ApplicationError::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::App(err) => err.kind(),
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Unauthorized(message) => message.clone(),
            ApiError::App(ApplicationError::Domain(_)) => "Internal server error".to_string(),
            ApiError::App(err) => err.to_string(),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        ApiError::App(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::App(ApplicationError::Domain(inner)) = &self {
            error!(code = inner.code(), error = %inner, "Request failed");
        }

        let status = self.status();
        let body = ErrorBody {
            success: false,
            message: self.public_message(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for request handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;
