//! Application Error
//!
//! [`AppError`] is the single shape every HTTP error is rendered from.
//! Module errors (e.g. `auth::AuthError`) convert into it at the edge.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// Unified application error
///
/// ```rust
/// use kernel::error::app_error::AppError;
///
/// use kernel::error::kind::ErrorKind;
///
/// let err = AppError::new(ErrorKind::Unauthorized, "Token has expired")
///     .with_action("Please log in again");
/// assert_eq!(err.status_code(), 401);
/// assert_eq!(err.action(), Some("Please log in again"));
/// ```
#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    /// Shown to the client
    message: Cow<'static, str>,
    /// What the client should do next
    action: Option<Cow<'static, str>>,
    /// Logged, never rendered
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        match &self.action {
            Some(action) => write!(f, " (Action: {action})"),
            None => Ok(()),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(AppError::bad_request("x").kind(), ErrorKind::BadRequest);
        assert_eq!(AppError::not_found("x").status_code(), 404);
        assert_eq!(AppError::conflict("x").status_code(), 409);
        assert_eq!(AppError::internal("x").status_code(), 500);
        assert_eq!(AppError::service_unavailable("x").status_code(), 503);
    }

    #[test]
    fn test_display() {
        let err = AppError::new(ErrorKind::Unauthorized, "Token has expired");
        assert_eq!(err.to_string(), "[Unauthorized] Token has expired");

        let err = err.with_action("Please log in again");
        assert_eq!(
            err.to_string(),
            "[Unauthorized] Token has expired (Action: Please log in again)"
        );
    }

    #[test]
    fn test_source_is_kept() {
        let err = AppError::internal("Password check failed")
            .with_source(std::io::Error::other("worker gone"));
        assert_eq!(err.source().unwrap().to_string(), "worker gone");
        assert!(err.is_server_error());
    }
}
