//! Authenticated User
//!
//! Identity attached to a request once the access guard lets it through.

use serde::Serialize;

use crate::domain::value_object::identity::IdentityClaim;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub uid: i64,
    pub id: String,
    pub email: String,
}

impl From<&IdentityClaim> for AuthUser {
    fn from(claim: &IdentityClaim) -> Self {
        Self {
            uid: claim.subject_id,
            id: claim.login_id.clone(),
            email: claim.email.clone(),
        }
    }
}
