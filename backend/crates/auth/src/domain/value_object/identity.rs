//! Token Identity
//!
//! What a signed token asserts about its bearer.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// The user a token is issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub subject_id: i64,
    pub login_id: String,
    pub email: String,
}

/// Identity claim embedded in every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    #[serde(rename = "uid")]
    pub subject_id: i64,
    #[serde(rename = "id")]
    pub login_id: String,
    pub email: String,
    /// Distinguishes refresh tokens from access tokens
    #[serde(rename = "refresh")]
    pub is_refresh: bool,
}

impl IdentityClaim {
    pub fn new(subject: &Subject, is_refresh: bool) -> Self {
        Self {
            subject_id: subject.subject_id,
            login_id: subject.login_id.clone(),
            email: subject.email.clone(),
            is_refresh,
        }
    }

    pub fn subject(&self) -> Subject {
        Subject {
            subject_id: self.subject_id,
            login_id: self.login_id.clone(),
            email: self.email.clone(),
        }
    }
}

/// Full token payload: identity plus registered claims (seconds since epoch)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub identity: IdentityClaim,
    /// Unique token id so two tokens minted in the same second differ
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    /// Time left before expiry (negative once expired)
    pub fn remaining(&self, now: DateTime<Utc>) -> TimeDelta {
        TimeDelta::seconds(self.exp - now.timestamp())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
