//! Nickname Value Object

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};

pub const NICKNAME_MAX_LENGTH: usize = 20;

/// Display name: trimmed, 1-20 characters, no control characters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nickname(String);

impl Nickname {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let trimmed = raw.into().trim().to_string();

        if trimmed.is_empty() {
            return Err(AppError::bad_request("Nickname cannot be empty"));
        }
        if trimmed.chars().count() > NICKNAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Nickname must be at most {NICKNAME_MAX_LENGTH} characters"
            )));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(AppError::bad_request("Nickname contains invalid characters"));
        }

        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_is_trimmed() {
        assert_eq!(Nickname::new("  Alice ").unwrap().as_str(), "Alice");
        assert!(Nickname::new("앨리스").is_ok());
    }

    #[test]
    fn test_nickname_invalid() {
        assert!(Nickname::new("   ").is_err());
        assert!(Nickname::new("n".repeat(21)).is_err());
        assert!(Nickname::new("tab\there").is_err());
    }
}
