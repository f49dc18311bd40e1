//! Gate Error Types
//!
//! This module provides gate-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Gate-specific result type alias
pub type GateResult<T> = Result<T, GateError>;

/// Gate-specific error variants
#[derive(Debug, Error)]
pub enum GateError {
    /// Invalid credentials (wrong email/password)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Session missing, expired, or rejected by the auth backend
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Authenticated user is not on the admin allow-list
    #[error("Not an allowed administrator")]
    NotAdmin,

    /// MFA code did not verify
    #[error("Invalid multi-factor authentication code")]
    InvalidMfaCode,

    /// Required request field missing or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Auth backend unreachable or answering 5xx
    #[error("Auth backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Auth backend answered with an unexpected payload or status
    #[error("Auth backend error: {0}")]
    Backend(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GateError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::InvalidCredentials | GateError::SessionInvalid => StatusCode::UNAUTHORIZED,
            GateError::NotAdmin => StatusCode::FORBIDDEN,
            GateError::InvalidMfaCode | GateError::MissingField(_) => StatusCode::BAD_REQUEST,
            GateError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GateError::Backend(_) | GateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GateError::InvalidCredentials | GateError::SessionInvalid => ErrorKind::Unauthorized,
            GateError::NotAdmin => ErrorKind::Forbidden,
            GateError::InvalidMfaCode | GateError::MissingField(_) => ErrorKind::BadRequest,
            GateError::BackendUnavailable(_) => ErrorKind::ServiceUnavailable,
            GateError::Backend(_) | GateError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            GateError::BackendUnavailable(msg) => {
                tracing::error!(message = %msg, "Auth backend unavailable");
            }
            GateError::Backend(msg) => {
                tracing::error!(message = %msg, "Auth backend error");
            }
            GateError::Internal(msg) => {
                tracing::error!(message = %msg, "Gate internal error");
            }
            GateError::InvalidCredentials => {
                tracing::warn!("Invalid admin login attempt");
            }
            GateError::NotAdmin => {
                tracing::warn!("Login attempt by non-admin account");
            }
            _ => {
                tracing::debug!(error = %self, "Gate error");
            }
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<reqwest::Error> for GateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            GateError::BackendUnavailable(err.to_string())
        } else {
            GateError::Backend(err.to_string())
        }
    }
}
