//! Credentials
//!
//! Validated login and registration input, and the user lookup derived
//! from login input.

use platform::password::ClearTextPassword;

use crate::domain::value_object::{email::Email, login_id::LoginId, nickname::Nickname};

/// Login input. At least one of `email` / `login_id` must be set for
/// authentication to proceed.
#[derive(Debug)]
pub struct LoginCredentials {
    pub email: Option<Email>,
    pub login_id: Option<LoginId>,
    pub password: ClearTextPassword,
}

impl LoginCredentials {
    pub fn has_identifier(&self) -> bool {
        self.email.is_some() || self.login_id.is_some()
    }

    pub fn lookup(&self) -> UserLookup {
        UserLookup {
            uid: None,
            email: self.email.as_ref().map(|e| e.as_str().to_string()),
            login_id: self.login_id.as_ref().map(|id| id.as_str().to_string()),
        }
    }
}

/// Sign-up input. The password is hashed before anything is stored.
#[derive(Debug)]
pub struct Registration {
    pub email: Email,
    pub login_id: LoginId,
    pub nickname: Nickname,
    pub password: ClearTextPassword,
}

/// Criteria for [`UserStore::find`](crate::domain::repository::UserStore::find).
/// Every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserLookup {
    pub uid: Option<i64>,
    pub email: Option<String>,
    pub login_id: Option<String>,
}

impl UserLookup {
    pub fn by_uid(uid: i64) -> Self {
        Self {
            uid: Some(uid),
            ..Default::default()
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }

    pub fn by_login_id(login_id: impl Into<String>) -> Self {
        Self {
            login_id: Some(login_id.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.uid.is_none() && self.email.is_none() && self.login_id.is_none()
    }
}
