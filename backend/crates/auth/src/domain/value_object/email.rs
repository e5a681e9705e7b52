//! Email Value Object
//!
//! Lowercased, trimmed address used both as a login identifier and as the
//! key for pending verification codes.

use std::fmt;
use std::str::FromStr;

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// RFC 5321 path limit
const MAX_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let normalized = raw.into().trim().to_lowercase();

        match normalized.len() {
            0 => return Err(AppError::bad_request("Email cannot be empty")),
            n if n > MAX_LEN => {
                return Err(AppError::bad_request(format!(
                    "Email must be at most {MAX_LEN} characters"
                )));
            }
            _ => {}
        }

        let well_formed = normalized
            .split_once('@')
            .is_some_and(|(local, domain)| local_part_ok(local) && domain_ok(domain));
        if !well_formed {
            return Err(AppError::bad_request("Invalid email format"));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

fn local_part_ok(local: &str) -> bool {
    !local.is_empty() && local.len() <= MAX_LOCAL_LEN && !local.contains(char::is_whitespace)
}

/// Dotted hostname; a second `@` fails the charset check
fn domain_ok(domain: &str) -> bool {
    let labels_ok = domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    });
    labels_ok && domain.contains('.')
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        for ok in ["alice@example.com", "a.b+tag@mail.example.co.jp", "x_1@a-b.io"] {
            assert!(Email::new(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "",
            "   ",
            "alice",
            "alice@",
            "@example.com",
            "alice@@example.com",
            "alice@localhost",
            "alice@example..com",
            "alice@-example.com",
            "al ice@example.com",
        ] {
            assert!(Email::new(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_rejects_overlong() {
        let long = format!("{}@example.com", "a".repeat(MAX_LEN));
        let err = Email::new(long).unwrap_err();
        assert!(err.message().contains("254"));
    }

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let email: Email = "  Alice@Example.COM ".parse().unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
        assert_eq!(email.to_string(), "alice@example.com");
    }
}
