//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token string was empty
    #[error("Token is missing")]
    TokenMissing,

    /// Token signature valid but past its expiry
    #[error("Token has expired")]
    TokenExpired,

    /// Malformed token or bad signature
    #[error("Token is invalid")]
    TokenInvalid,

    /// Neither email nor login id supplied
    #[error("Email or login id is required")]
    CredentialsMissing,

    /// No active user matches the lookup
    #[error("User not found")]
    UserNotFound,

    /// Password mismatch
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Email, login id or nickname already taken
    #[error("{0}")]
    Conflict(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::TokenMissing | AuthError::CredentialsMissing | AuthError::BadRequest(_) => {
                ErrorKind::BadRequest
            }
            AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::InvalidCredentials
            | AuthError::Unauthorized(_) => ErrorKind::Unauthorized,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Conflict(_) => ErrorKind::Conflict,
            AuthError::Database(e) => AppError::from(e).kind(),
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Whether the request was rejected on its merits (as opposed to the
    /// server failing to answer it)
    pub fn is_rejection(&self) -> bool {
        !matches!(self, AuthError::Database(_) | AuthError::Internal(_))
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            // Driver messages stay in the source, never in the body
            AuthError::Database(e) => AppError::from(e),
            AuthError::TokenExpired | AuthError::Unauthorized(_) => {
                AppError::new(self.kind(), self.to_string()).with_action("Please log in again")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Unauthorized(msg) => {
                tracing::info!(message = %msg, "Request rejected");
            }
            AuthError::Conflict(msg) => {
                tracing::info!(message = %msg, "Registration conflict");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            AuthError::Internal(err.to_string())
        } else {
            AuthError::BadRequest(err.message().to_string())
        }
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
