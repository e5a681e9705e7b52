//! User Entity
//!
//! Stored account as seen by the auth flows. Soft-deleted accounts are
//! never materialized.

use crate::domain::value_object::identity::Subject;

/// User record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Numeric subject identifier
    pub uid: i64,
    /// Login id (unique handle)
    pub login_id: String,
    /// Display name
    pub nickname: String,
    /// Email address (unique)
    pub email: String,
    /// PHC-formatted password hash
    pub password_hash: String,
}

impl UserRecord {
    /// Identity carried into issued tokens
    pub fn subject(&self) -> Subject {
        Subject {
            subject_id: self.uid,
            login_id: self.login_id.clone(),
            email: self.email.clone(),
        }
    }
}

/// Account about to be inserted. `uid` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub login_id: String,
    pub nickname: String,
    /// Lowercased address
    pub email: String,
    pub password_hash: String,
}
