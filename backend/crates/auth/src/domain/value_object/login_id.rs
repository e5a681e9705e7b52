//! Login Id Value Object
//!
//! Public handle used to log in instead of an email address.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

pub const LOGIN_ID_MIN_LENGTH: usize = 3;
pub const LOGIN_ID_MAX_LENGTH: usize = 20;

/// Login id: 3-20 ASCII letters, digits or underscores
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoginId(String);

impl LoginId {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let raw = raw.into();
        let len = raw.chars().count();

        if !(LOGIN_ID_MIN_LENGTH..=LOGIN_ID_MAX_LENGTH).contains(&len) {
            return Err(AppError::bad_request(format!(
                "Login id must be {}-{} characters",
                LOGIN_ID_MIN_LENGTH, LOGIN_ID_MAX_LENGTH
            )));
        }

        if !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AppError::bad_request(
                "Login id may only contain letters, digits and underscores",
            ));
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_id_valid() {
        assert!(LoginId::new("abc").is_ok());
        assert!(LoginId::new("user_01").is_ok());
        assert!(LoginId::new("a".repeat(20)).is_ok());
    }

    #[test]
    fn test_login_id_invalid() {
        assert!(LoginId::new("ab").is_err());
        assert!(LoginId::new("a".repeat(21)).is_err());
        assert!(LoginId::new("user-01").is_err());
        assert!(LoginId::new("user name").is_err());
        assert!(LoginId::new("ユーザー名").is_err());
    }

    #[test]
    fn test_login_id_keeps_case() {
        assert_eq!(LoginId::new("UserOne").unwrap().as_str(), "UserOne");
    }
}
